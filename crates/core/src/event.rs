//! Decoded corrected-error event, as handed to the [`crate::accountant`]
//! by whatever consumes raw machine-check records (out of scope here).

use crate::bucket::Timestamp;

/// The subset of MCE status-register bits the accounting core cares
/// about. Parsing the full status register is out of scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    /// Address-valid bit: `false` means `addr` must not be trusted.
    pub addrv: bool,
    /// Uncorrected bit: `true` means this was not a *corrected* error.
    pub uc: bool,
}

/// CPU models that need model-specific handling. Anything not listed is
/// `Other` and gets no special treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CpuModel {
    SandyBridgeEp,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct CeEvent {
    pub addr: u64,
    pub status: StatusFlags,
    pub time: Timestamp,
    pub cpu: u32,
    pub ext_cpu: u32,
    pub bank: u32,
    pub socket_id: u8,
    pub channel: u8,
    pub dimm: u8,
}
