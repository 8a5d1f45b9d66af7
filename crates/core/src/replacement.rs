//! Singleton rate monitor over the table's own replacement traffic: a
//! steady stream of replacements means the table is undersized for the
//! workload, independent of any single page's behaviour.

use crate::bucket::{account, Bucket, BucketConfig, Timestamp};

#[derive(Debug, Default)]
pub struct ReplacementMonitor {
    pub count: u64,
    pub bucket: Bucket,
}

impl ReplacementMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one replacement and reports whether the replacement-rate
    /// bucket now signals.
    pub fn record_replacement(&mut self, cfg: &BucketConfig, now: Timestamp) -> bool {
        self.count += 1;
        account(cfg, &mut self.bucket, 1, now)
    }
}
