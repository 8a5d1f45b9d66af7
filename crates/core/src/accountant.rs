//! Entry point: ingests one decoded CE event, drives the address index
//! and cluster pool to obtain a record, evaluates thresholds, and fires
//! offlining + triggers when warranted.

use crate::bucket::{account as bucket_account, BucketConfig};
use crate::cluster::ClusterPool;
use crate::config::Config;
use crate::dimm::{DimmKey, DimmTopology};
use crate::event::{CeEvent, CpuModel};
use crate::index::AddrIndex;
use crate::offliner::{offline_action, Offliner, OfflineMode};
use crate::record::OfflineStatus;
use crate::replacement::ReplacementMonitor;
use crate::spawn::Spawner;
use crate::sysfs::SysfsWriter;
use crate::trigger::{TriggerMessage, TriggerRunner};

/// Single owner of all accounting state, constructed once by
/// [`crate::setup::setup`] and threaded through every
/// [`Accountant::account_event`] call. Replaces the source's reliance on
/// process-wide singletons (see the "Global state" design note).
pub struct MceCore {
    pub pool: ClusterPool,
    pub index: AddrIndex,
    pub replacement: ReplacementMonitor,
    pub config: Config,
    pub page_bucket_cfg: BucketConfig,
    pub replacement_bucket_cfg: BucketConfig,
    pub live_count: u64,
    pub sysfs: Box<dyn SysfsWriter>,
    pub spawner: Box<dyn Spawner>,
    pub dimm: Box<dyn DimmTopology>,
}

pub struct Accountant;

impl Accountant {
    /// Accounts for one decoded event. Single-threaded: the caller must
    /// not invoke this again for `core` until this call returns.
    pub fn account_event(core: &mut MceCore, event: CeEvent) {
        if core.config.action == OfflineMode::Off {
            return;
        }
        if !event.status.addrv || event.status.uc {
            return;
        }
        if core.config.cpu_model == CpuModel::SandyBridgeEp && event.bank == 1 {
            let effective_cpu = if event.ext_cpu != 0 {
                event.ext_cpu
            } else {
                event.cpu
            };
            if effective_cpu == 0 {
                return;
            }
        }

        let addr = event.addr & !(core.config.page_size - 1);

        let MceCore {
            pool,
            index,
            replacement,
            config,
            page_bucket_cfg,
            replacement_bucket_cfg,
            live_count,
            sysfs,
            spawner,
            dimm,
        } = core;

        let handle = match index.lookup(addr) {
            Some(handle) => {
                pool.touch(handle);
                handle
            }
            None if *live_count < config.max_corr_err_counters => {
                let handle = pool.alloc();
                pool.get_mut(handle).reset(addr);
                index.insert(addr, handle);
                *live_count += 1;
                handle
            }
            None => {
                let (handle, evicted) = pool.replace();
                for evicted_addr in evicted {
                    index.remove(evicted_addr);
                }
                pool.get_mut(handle).reset(addr);
                index.force_insert(addr, handle);
                pool.touch(handle);

                if replacement.record_replacement(replacement_bucket_cfg, event.time) {
                    if let Some(path) = config
                        .replacement_trigger_path
                        .as_deref()
                        .and_then(|p| p.to_str())
                    {
                        TriggerRunner::new(spawner.as_ref(), path).fire_async(&TriggerMessage {
                            threshold: replacement_bucket_cfg.capacity,
                            total_count: replacement.count,
                            last_event: Some(event.time),
                            agetime_secs: replacement_bucket_cfg.agetime_secs,
                            message: "memory page counter replacement".to_string(),
                            threshold_count: replacement_bucket_cfg.capacity,
                        });
                    }
                }

                handle
            }
        };

        let record = pool.get_mut(handle);
        record.ce_count += 1;

        let signalled = bucket_account(page_bucket_cfg, &mut record.bucket, 1, event.time);
        if !signalled {
            return;
        }
        if record.offline_status != OfflineStatus::Online {
            return;
        }

        let dimm_handle = dimm.lookup(DimmKey {
            socket: event.socket_id,
            channel: event.channel,
            dimm: event.dimm,
        });
        let dimm_label = dimm_handle.map(|h| h.0).unwrap_or_else(|| "unknown".to_string());

        if let Some(path) = config.page_trigger_path.as_deref().and_then(|p| p.to_str()) {
            TriggerRunner::new(spawner.as_ref(), path).fire_async(&TriggerMessage {
                threshold: page_bucket_cfg.capacity,
                total_count: record.ce_count,
                last_event: Some(event.time),
                agetime_secs: page_bucket_cfg.agetime_secs,
                message: format!("page {addr:#x} on dimm {dimm_label}"),
                threshold_count: page_bucket_cfg.capacity,
            });
        }
        record.triggered = true;

        let offliner = Offliner::new(config.action, sysfs.as_ref());
        match config.action {
            OfflineMode::Soft | OfflineMode::SoftThenHard => {
                if let Some(path) = config.pre_soft_trigger_path.as_deref().and_then(|p| p.to_str())
                {
                    let runner = TriggerRunner::new(spawner.as_ref(), path);
                    let _ = runner.fire_sync(
                        &[path.to_string(), addr.to_string()],
                        &TriggerMessage {
                            threshold: page_bucket_cfg.capacity,
                            total_count: record.ce_count,
                            last_event: Some(event.time),
                            agetime_secs: page_bucket_cfg.agetime_secs,
                            message: format!("page {addr:#x}"),
                            threshold_count: page_bucket_cfg.capacity,
                        },
                    );
                }

                offline_action(&offliner, record, addr, config.row_radius, config.page_size);

                if let Some(path) = config
                    .post_soft_trigger_path
                    .as_deref()
                    .and_then(|p| p.to_str())
                {
                    let runner = TriggerRunner::new(spawner.as_ref(), path);
                    let _ = runner.fire_sync(
                        &[path.to_string(), addr.to_string()],
                        &TriggerMessage {
                            threshold: page_bucket_cfg.capacity,
                            total_count: record.ce_count,
                            last_event: Some(event.time),
                            agetime_secs: page_bucket_cfg.agetime_secs,
                            message: format!("page {addr:#x}"),
                            threshold_count: page_bucket_cfg.capacity,
                        },
                    );
                }
            }
            _ => {
                offline_action(&offliner, record, addr, config.row_radius, config.page_size);
            }
        }
    }
}
