use thiserror::Error;

/// Errors raised while constructing a [`crate::bucket::BucketConfig`].
#[derive(Debug, Error)]
pub enum BucketError {
    #[error("bucket agetime must be non-zero when capacity is {capacity}")]
    ZeroAgetime { capacity: u64 },
}

/// Errors raised while resolving configuration into a running [`crate::accountant::MceCore`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("page trigger bucket: {0}")]
    PageBucket(#[source] BucketError),
    #[error("replacement trigger bucket: {0}")]
    ReplacementBucket(#[source] BucketError),
    #[error("max_corr_err_counters must be non-zero")]
    ZeroCapacity,
}

/// Errors raised while dispatching a trigger command.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("failed to spawn trigger {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
