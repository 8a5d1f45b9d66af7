//! Resolves already-loaded configuration into a ready-to-run
//! [`crate::accountant::MceCore`]: rounds the capacity bound up to a
//! multiple of the cluster slot count, demotes the offline mode if its
//! kernel path isn't writable, and initialises the replacement monitor.

use crate::accountant::MceCore;
use crate::cluster::{slots_per_cluster, ClusterPool};
use crate::config::Config;
use crate::dimm::DimmTopology;
use crate::error::SetupError;
use crate::index::AddrIndex;
use crate::offliner::resolve_mode;
use crate::replacement::ReplacementMonitor;
use crate::spawn::Spawner;
use crate::sysfs::SysfsWriter;

pub fn setup(
    mut config: Config,
    sysfs: Box<dyn SysfsWriter>,
    spawner: Box<dyn Spawner>,
    dimm: Box<dyn DimmTopology>,
) -> Result<MceCore, SetupError> {
    if config.max_corr_err_counters == 0 {
        return Err(SetupError::ZeroCapacity);
    }

    let n = slots_per_cluster() as u64;
    let rounded = config.max_corr_err_counters.div_ceil(n) * n;
    if rounded != config.max_corr_err_counters {
        tracing::info!(
            requested = config.max_corr_err_counters,
            rounded,
            "rounding max_corr_err_counters up to a multiple of the cluster slot count"
        );
        config.max_corr_err_counters = rounded;
    }

    let page_bucket_cfg = config
        .page_trigger
        .resolve()
        .map_err(SetupError::PageBucket)?;
    let replacement_bucket_cfg = config
        .replacement_trigger
        .resolve()
        .map_err(SetupError::ReplacementBucket)?;

    config.action = resolve_mode(config.action, sysfs.as_ref());

    Ok(MceCore {
        pool: ClusterPool::new(),
        index: AddrIndex::new(),
        replacement: ReplacementMonitor::new(),
        config,
        page_bucket_cfg,
        replacement_bucket_cfg,
        live_count: 0,
        sysfs,
        spawner,
        dimm,
    })
}
