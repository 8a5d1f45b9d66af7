//! Snapshot printer: walks the index in address order and emits one line
//! per tracked page.

use crate::accountant::MceCore;
use crate::bucket::bucket_output;
use crate::record::OfflineStatus;
use std::io::{self, Write};

fn status_name(status: OfflineStatus) -> &'static str {
    match status {
        OfflineStatus::Online => "online",
        OfflineStatus::Offline => "offline",
        OfflineStatus::OfflineFailed => "offline-failed",
    }
}

/// Writes a header and one line per live record (address, total count,
/// bucket summary, status, and a `triggered` suffix when set) to `out`.
/// Writes nothing at all if there are no records.
pub fn dump(core: &MceCore, out: &mut impl Write) -> io::Result<()> {
    if core.index.is_empty() {
        return Ok(());
    }

    writeln!(out, "Per page corrected memory statistics:")?;
    for (addr, handle) in core.index.iter_ascending() {
        let record = core.pool.get(handle);
        let bucket_summary = bucket_output(&core.page_bucket_cfg, &record.bucket);
        write!(
            out,
            "{addr:x} {count} {bucket_summary} {status}",
            addr = addr,
            count = record.ce_count,
            status = status_name(record.offline_status),
        )?;
        if record.triggered {
            write!(out, " triggered")?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;
    Ok(())
}
