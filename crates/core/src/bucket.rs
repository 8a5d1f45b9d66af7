//! Leaky-bucket rate/threshold primitive.
//!
//! The bucket never reads the wall clock itself; every call is handed a
//! `now` by the caller (the event's own timestamp, or a monotonic tick),
//! so the same logic works for per-page thresholds evaluated against
//! event time and for a replacement-rate threshold evaluated against
//! whatever the event loop considers "now".

use crate::error::BucketError;

/// Opaque point in time, in seconds. Interpretation (wall clock, monotonic
/// ticks, event time) is up to the caller; the bucket only computes deltas.
pub type Timestamp = u64;

/// Capacity + aging parameters for one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketConfig {
    pub capacity: u64,
    pub agetime_secs: u64,
}

impl BucketConfig {
    pub fn new(capacity: u64, agetime_secs: u64) -> Result<Self, BucketError> {
        if capacity > 0 && agetime_secs == 0 {
            return Err(BucketError::ZeroAgetime { capacity });
        }
        Ok(Self {
            capacity,
            agetime_secs,
        })
    }

    fn leak_rate(&self) -> f64 {
        if self.agetime_secs == 0 {
            0.0
        } else {
            self.capacity as f64 / self.agetime_secs as f64
        }
    }
}

/// Per-subject bucket state. Starts empty via [`Default`]/[`bucket_init`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Bucket {
    credits: f64,
    last_seen: Option<Timestamp>,
}

/// Zeroes a bucket's accumulated state, as if never touched.
pub fn bucket_init(bucket: &mut Bucket) {
    *bucket = Bucket::default();
}

/// Ages out credits older than `cfg.agetime_secs`, adds `increment`, and
/// reports whether the bucket is at or over capacity as of `now`.
///
/// Timestamps are not required to be monotonic: a `now` older than the
/// bucket's last-seen time is treated as a repeat of "now" (no aging, no
/// rewind), which keeps the bucket well-defined under reordered events.
pub fn account(cfg: &BucketConfig, bucket: &mut Bucket, increment: u64, now: Timestamp) -> bool {
    match bucket.last_seen {
        Some(last) if now > last => {
            let elapsed = (now - last) as f64;
            bucket.credits = (bucket.credits - elapsed * cfg.leak_rate()).max(0.0);
        }
        None => {}
        _ => {}
    }
    bucket.last_seen = Some(now);
    bucket.credits += increment as f64;
    bucket.credits >= cfg.capacity as f64
}

/// Short human-readable summary: "<count within window>/<capacity>".
pub fn bucket_output(cfg: &BucketConfig, bucket: &Bucket) -> String {
    format!("{}/{}", bucket.credits.round() as u64, cfg.capacity)
}
