//! Offlining state machine: maps an offline-mode configuration and a
//! target address onto sysfs writes, with the soft-then-hard fallback and
//! a row-offlining helper for neighbouring pages.

use crate::record::{OfflineStatus, PageRecord};
use crate::sysfs::{SysfsWriter, HARD_OFFLINE_PATH, SOFT_OFFLINE_PATH};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfflineMode {
    Off,
    Account,
    Soft,
    Hard,
    SoftThenHard,
}

/// Demotes `requested` to [`OfflineMode::Account`] if the kernel path(s)
/// it depends on are not writable, logging a notice. `SoftThenHard`
/// requires both paths: if the soft-offline attempt has nowhere to write,
/// the mode cannot do what its name promises, so it is demoted same as a
/// bare `Soft` would be.
pub fn resolve_mode(requested: OfflineMode, writer: &dyn SysfsWriter) -> OfflineMode {
    let demote = match requested {
        OfflineMode::Off | OfflineMode::Account => false,
        OfflineMode::Soft => !writer.writable(SOFT_OFFLINE_PATH),
        OfflineMode::Hard => !writer.writable(HARD_OFFLINE_PATH),
        OfflineMode::SoftThenHard => {
            !writer.writable(SOFT_OFFLINE_PATH) || !writer.writable(HARD_OFFLINE_PATH)
        }
    };
    if demote {
        tracing::warn!(
            requested = ?requested,
            "kernel offline interface unavailable, demoting to account-only"
        );
        OfflineMode::Account
    } else {
        requested
    }
}

pub struct Offliner<'a> {
    mode: OfflineMode,
    writer: &'a dyn SysfsWriter,
}

impl<'a> Offliner<'a> {
    pub fn new(mode: OfflineMode, writer: &'a dyn SysfsWriter) -> Self {
        Self { mode, writer }
    }

    fn write_soft(&self, addr: u64) -> io::Result<()> {
        self.writer.write(SOFT_OFFLINE_PATH, &format!("{addr:#x}"))
    }

    fn write_hard(&self, addr: u64) -> io::Result<()> {
        self.writer.write(HARD_OFFLINE_PATH, &format!("{addr:#x}"))
    }

    /// Offlines a single page per the configured mode. `Off`/`Account` are
    /// no-ops (observe-only); `SoftThenHard`'s result is the *second*
    /// attempt's outcome when the first one fails.
    pub fn offline(&self, addr: u64) -> io::Result<()> {
        match self.mode {
            OfflineMode::Off | OfflineMode::Account => Ok(()),
            OfflineMode::Soft => self.write_soft(addr),
            OfflineMode::Hard => self.write_hard(addr),
            OfflineMode::SoftThenHard => self.write_soft(addr).or_else(|_| self.write_hard(addr)),
        }
    }

    /// Attempts to offline `addr` and `radius` pages above and below it.
    /// Preserves the source behaviour of aborting on the first failed
    /// neighbour rather than accumulating failures and continuing — see
    /// the row-offline design note in DESIGN.md before "fixing" this.
    pub fn offline_row(&self, addr: u64, radius: u32, page_size: u64) -> io::Result<()> {
        let radius = radius as i64;
        for k in -radius..=radius {
            let target = (addr as i128 + k as i128 * page_size as i128) as u64;
            self.offline(target)?;
        }
        Ok(())
    }
}

/// Logs intent, invokes the offliner over the target page and its
/// `radius` neighbours on either side, and updates `record.offline_status`
/// accordingly. Only called while the record is still `Online`; once it
/// leaves that state the caller does not invoke this again (§4.4).
pub fn offline_action(
    offliner: &Offliner,
    record: &mut PageRecord,
    addr: u64,
    radius: u32,
    page_size: u64,
) {
    tracing::info!(address = %format_args!("{addr:#x}"), mode = ?offliner.mode, radius, "offlining page");
    match offliner.offline_row(addr, radius, page_size) {
        Ok(()) => {
            record.offline_status = OfflineStatus::Offline;
        }
        Err(err) => {
            tracing::warn!(address = %format_args!("{addr:#x}"), error = %err, "failed to offline page");
            record.offline_status = OfflineStatus::OfflineFailed;
        }
    }
}
