mod cli;
mod config;
mod dimm;
mod spawn;
mod sysfs;

use clap::Parser;
use dimm::TableDimmTopology;
use mce_core::event::{CeEvent, StatusFlags};
use mce_core::{Accountant, MceCore};
use spawn::ProcessSpawner;
use sysfs::FsSysfsWriter;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration};

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let config = config::load(&cli.config)?;
    let dimm = TableDimmTopology::load(&cli.config)?;

    let mut core = mce_core::setup(
        config,
        Box::new(FsSysfsWriter),
        Box::new(ProcessSpawner),
        Box::new(dimm),
    )?;

    run(&mut core, cli.report_interval_secs).await
}

#[derive(Debug, thiserror::Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Setup(#[from] mce_core::error::SetupError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reads `addr,time,cpu,ext_cpu,bank,socket,channel,dimm,addrv,uc` lines
/// from stdin, feeding each into the accounting core, and prints a
/// snapshot every `report_interval_secs` while idle. This line format is a
/// stand-in for the real MCE decoder, which is out of scope here (see
/// SPEC_FULL.md §10.6) — it exists so the daemon has something to drive
/// the pipeline with.
async fn run(core: &mut MceCore, report_interval_secs: u64) -> Result<(), DaemonError> {
    let stdin = BufReader::new(io::stdin());
    let mut lines = stdin.lines();
    let mut ticker = interval(Duration::from_secs(report_interval_secs.max(1)));
    ticker.tick().await; // first tick fires immediately, skip it

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if let Some(event) = parse_event_line(&line) {
                            Accountant::account_event(core, event);
                        } else if !line.trim().is_empty() {
                            tracing::warn!(%line, "unparsable event line, skipping");
                        }
                    }
                    None => break,
                }
            }
            _ = ticker.tick() => {
                let mut out = std::io::stdout();
                mce_core::reporter::dump(core, &mut out)?;
            }
        }
    }

    let mut out = std::io::stdout();
    mce_core::reporter::dump(core, &mut out)?;
    Ok(())
}

fn parse_event_line(line: &str) -> Option<CeEvent> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != 10 {
        return None;
    }
    Some(CeEvent {
        addr: u64::from_str_radix(fields[0].trim_start_matches("0x"), 16).ok()?,
        time: fields[1].parse().ok()?,
        cpu: fields[2].parse().ok()?,
        ext_cpu: fields[3].parse().ok()?,
        bank: fields[4].parse().ok()?,
        socket_id: fields[5].parse().ok()?,
        channel: fields[6].parse().ok()?,
        dimm: fields[7].parse().ok()?,
        status: StatusFlags {
            addrv: parse_bool(fields[8])?,
            uc: parse_bool(fields[9])?,
        },
    })
}

fn parse_bool(field: &str) -> Option<bool> {
    match field {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}
