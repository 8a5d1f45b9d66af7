use clap::Parser;
use std::path::PathBuf;

/// Per-page corrected-memory-error accounting daemon.
#[derive(Parser, Debug)]
#[command(name = "mced", version, about)]
pub struct Cli {
    /// Path to the TOML config file (bucket thresholds, offline mode,
    /// trigger paths, DIMM table).
    #[arg(long, default_value = "/etc/mced.toml")]
    pub config: PathBuf,

    /// How often to print a snapshot of the accounting table to stdout
    /// while idle.
    #[arg(long, default_value_t = 60)]
    pub report_interval_secs: u64,
}
