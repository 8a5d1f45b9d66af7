//! Abstract lookup of a DIMM handle by (socket, channel, dimm), attached
//! to outgoing trigger messages. The real topology database is out of
//! scope for the core; see `mced::dimm` for a concrete table-backed one.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimmKey {
    pub socket: u8,
    pub channel: u8,
    pub dimm: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimmHandle(pub String);

pub trait DimmTopology {
    fn lookup(&self, key: DimmKey) -> Option<DimmHandle>;
}
