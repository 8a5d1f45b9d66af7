//! Ordered associative map from page-aligned physical address to a record
//! handle. Backed by a `BTreeMap` for O(log n) lookup/insert/remove and
//! ascending iteration, per the spec's "any ordered O(log n) structure is
//! acceptable" note.

use crate::cluster::RecordHandle;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct AddrIndex {
    map: BTreeMap<u64, RecordHandle>,
}

impl AddrIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, addr: u64) -> Option<RecordHandle> {
        self.map.get(&addr).copied()
    }

    /// Binds `addr` to `handle` unless `addr` is already present, in which
    /// case the existing handle is returned unchanged.
    pub fn insert(&mut self, addr: u64, handle: RecordHandle) -> Option<RecordHandle> {
        if let Some(&existing) = self.map.get(&addr) {
            return Some(existing);
        }
        self.map.insert(addr, handle);
        None
    }

    pub fn remove(&mut self, addr: u64) -> Option<RecordHandle> {
        self.map.remove(&addr)
    }

    /// Removes `old_addr` (a no-op if absent) and inserts `new_addr`,
    /// unconditionally overwriting any prior binding at `new_addr`.
    pub fn rebind(&mut self, old_addr: u64, new_addr: u64, handle: RecordHandle) {
        self.map.remove(&old_addr);
        self.map.insert(new_addr, handle);
    }

    /// Binds `addr` to `handle`, unconditionally overwriting any prior
    /// binding. Used after a slot has been reclaimed and its previous
    /// occupants already removed individually, where there is no single
    /// "old address" to hand to [`Self::rebind`].
    pub fn force_insert(&mut self, addr: u64, handle: RecordHandle) {
        self.map.insert(addr, handle);
    }

    pub fn iter_ascending(&self) -> impl Iterator<Item = (u64, RecordHandle)> + '_ {
        self.map.iter().map(|(&addr, &handle)| (addr, handle))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
