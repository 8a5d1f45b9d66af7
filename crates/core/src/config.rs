//! Resolved configuration values the core consumes. The core never loads
//! a config file itself — see `mced::config` for the TOML loader that
//! produces one of these.

use crate::bucket::BucketConfig;
use crate::error::BucketError;
use crate::event::CpuModel;
use crate::offliner::OfflineMode;
use std::path::PathBuf;

/// A bucket as written in configuration, before validation.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct BucketSetting {
    pub capacity: u64,
    pub agetime_secs: u64,
}

impl BucketSetting {
    pub fn resolve(&self) -> Result<BucketConfig, BucketError> {
        BucketConfig::new(self.capacity, self.agetime_secs)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// `memory-ce`: per-page error threshold.
    pub page_trigger: BucketSetting,
    /// `memory-ce-counter-replacement`: replacement-rate threshold.
    pub replacement_trigger: BucketSetting,
    /// `memory-ce-action`.
    pub action: OfflineMode,
    pub max_corr_err_counters: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Number of neighbouring pages offlined above/below the target by
    /// the row-offline helper.
    #[serde(default)]
    pub row_radius: u32,
    /// Command run asynchronously when a page's threshold first fires.
    pub page_trigger_path: Option<PathBuf>,
    /// Command run asynchronously when the replacement-rate threshold
    /// fires.
    pub replacement_trigger_path: Option<PathBuf>,
    /// `memory-pre-sync-soft-ce-trigger`.
    pub pre_soft_trigger_path: Option<PathBuf>,
    /// `memory-post-sync-soft-ce-trigger`.
    pub post_soft_trigger_path: Option<PathBuf>,
    #[serde(default = "default_cpu_model")]
    pub cpu_model: CpuModel,
}

fn default_page_size() -> u64 {
    4096
}

fn default_cpu_model() -> CpuModel {
    CpuModel::Other
}
