use crate::bucket::Bucket;

/// State of a tracked page with respect to kernel offlining.
///
/// Once a record leaves `Online` it stays there: no further offline
/// attempts are made for that address (see module docs on [`crate::offliner`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineStatus {
    Online,
    Offline,
    OfflineFailed,
}

/// Per-page accounting state. Lives inside a [`crate::cluster::ClusterPool`]
/// slot; only reachable (addressable) while indexed in
/// [`crate::index::AddrIndex`].
#[derive(Debug, Clone, Copy)]
pub struct PageRecord {
    pub address: u64,
    pub offline_status: OfflineStatus,
    pub triggered: bool,
    pub ce_count: u64,
    pub bucket: Bucket,
}

impl Default for PageRecord {
    fn default() -> Self {
        Self {
            address: 0,
            offline_status: OfflineStatus::Online,
            triggered: false,
            ce_count: 0,
            bucket: Bucket::default(),
        }
    }
}

impl PageRecord {
    /// Reinitialises the record for reuse at `address`: resets status,
    /// trigger latch, count, and bucket. Used by both fresh allocation and
    /// slot reclamation.
    pub fn reset(&mut self, address: u64) {
        self.address = address;
        self.offline_status = OfflineStatus::Online;
        self.triggered = false;
        self.ce_count = 0;
        self.bucket = Bucket::default();
    }
}
