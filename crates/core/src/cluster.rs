//! Slab-style allocator for [`PageRecord`]s, grouped into page-sized
//! clusters and ordered on an LRU list for eviction.
//!
//! Records never move once allocated: the index (`AddrIndex`) stores a
//! [`RecordHandle`] (cluster index + slot index) rather than a pointer or
//! reference, so reclaiming a cluster can never leave a dangling borrow —
//! it just means the slots at that handle now hold different data, and the
//! caller is responsible for telling the index so (see
//! [`ClusterPool::replace`]).

use crate::record::PageRecord;
use std::collections::VecDeque;

/// Host page size assumed for cluster sizing.
pub const PAGE_SIZE: usize = 4096;

/// Size, in bytes, of the LRU link embedded in each cluster in the source
/// design. Kept only to compute `N` the way the spec defines it; this
/// implementation's actual LRU ordering lives in [`ClusterPool::lru`], not
/// in the cluster itself.
const LRU_LINK_BYTES: usize = 16;

/// Stable handle to a record's slot. Never invalidated by reclamation:
/// the same `(cluster, slot)` simply comes to hold a different address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHandle {
    cluster: usize,
    slot: usize,
}

/// Computes `N`, the number of `PageRecord` slots that fit in one
/// `PAGE_SIZE` cluster alongside the (conceptual) LRU link.
pub fn slots_per_cluster() -> usize {
    let n = (PAGE_SIZE - LRU_LINK_BYTES) / std::mem::size_of::<PageRecord>();
    n.max(1)
}

struct Cluster {
    slots: Vec<PageRecord>,
    used: usize,
}

impl Cluster {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![PageRecord::default(); capacity],
            used: 0,
        }
    }
}

/// Bounded-memory allocator: hands out [`PageRecord`] slots from
/// page-sized clusters, reclaiming from the LRU tail once the configured
/// capacity is reached.
pub struct ClusterPool {
    clusters: Vec<Cluster>,
    /// Cluster indices, front = most recently touched, back = LRU.
    lru: VecDeque<usize>,
    current: usize,
    slots_per_cluster: usize,
}

impl ClusterPool {
    pub fn new() -> Self {
        let slots_per_cluster = slots_per_cluster();
        let mut pool = Self {
            clusters: Vec::new(),
            lru: VecDeque::new(),
            current: 0,
            slots_per_cluster,
        };
        pool.push_new_cluster();
        pool
    }

    pub fn slots_per_cluster(&self) -> usize {
        self.slots_per_cluster
    }

    fn push_new_cluster(&mut self) {
        let idx = self.clusters.len();
        self.clusters.push(Cluster::new(self.slots_per_cluster));
        self.lru.push_front(idx);
        self.current = idx;
    }

    /// Moves `handle`'s enclosing cluster to the LRU head, if not already
    /// there.
    pub fn touch(&mut self, handle: RecordHandle) {
        if self.lru.front() == Some(&handle.cluster) {
            return;
        }
        if let Some(pos) = self.lru.iter().position(|&c| c == handle.cluster) {
            self.lru.remove(pos);
        }
        self.lru.push_front(handle.cluster);
    }

    /// Allocates a fresh slot, growing the pool with a new cluster if the
    /// current one is full. Fatal (panics) on allocation failure, matching
    /// the source's "fails fatally on out-of-memory" contract — there is
    /// no way to run this accounting core without a slot to write into.
    pub fn alloc(&mut self) -> RecordHandle {
        if self.clusters[self.current].used == self.slots_per_cluster {
            self.push_new_cluster();
        }
        let cluster = &mut self.clusters[self.current];
        let slot = cluster.used;
        cluster.used += 1;
        cluster.slots[slot].reset(0);
        let handle = RecordHandle {
            cluster: self.current,
            slot,
        };
        self.touch(handle);
        handle
    }

    /// Reclaims a slot for reuse. Returns the handle plus the addresses of
    /// every record invalidated as a side effect — empty unless the whole
    /// LRU-tail cluster had to be adopted, in which case every record that
    /// was in it is invalidated at once and the caller MUST remove all of
    /// them from `AddrIndex` before rebinding the returned handle (see
    /// module docs; this is the "correctness-preserving" reading of the
    /// eviction ambiguity).
    pub fn replace(&mut self) -> (RecordHandle, Vec<u64>) {
        if self.clusters[self.current].used < self.slots_per_cluster {
            return (self.alloc(), Vec::new());
        }

        let tail = *self
            .lru
            .back()
            .expect("pool always has at least one cluster");
        let evicted: Vec<u64> = self.clusters[tail]
            .slots
            .iter()
            .map(|record| record.address)
            .collect();

        let cluster = &mut self.clusters[tail];
        cluster.used = 1;
        cluster.slots[0].reset(0);
        self.current = tail;
        self.touch(RecordHandle {
            cluster: tail,
            slot: 0,
        });

        (
            RecordHandle {
                cluster: tail,
                slot: 0,
            },
            evicted,
        )
    }

    pub fn get(&self, handle: RecordHandle) -> &PageRecord {
        &self.clusters[handle.cluster].slots[handle.slot]
    }

    pub fn get_mut(&mut self, handle: RecordHandle) -> &mut PageRecord {
        &mut self.clusters[handle.cluster].slots[handle.slot]
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }
}

impl Default for ClusterPool {
    fn default() -> Self {
        Self::new()
    }
}
