//! Per-physical-page corrected-memory-error accounting core.
//!
//! This crate is the accounting engine only: it consumes already-decoded
//! events and drives sysfs writes / trigger commands through the
//! [`sysfs::SysfsWriter`], [`spawn::Spawner`], and [`dimm::DimmTopology`]
//! traits. Parsing raw machine-check records, loading configuration
//! files, and installing a logging subscriber are all the caller's job —
//! see the `mced` binary crate for one way to wire those up.

pub mod accountant;
pub mod bucket;
pub mod cluster;
pub mod config;
pub mod dimm;
pub mod error;
pub mod event;
pub mod index;
pub mod offliner;
pub mod record;
pub mod replacement;
pub mod reporter;
pub mod setup;
pub mod spawn;
pub mod sysfs;
pub mod trigger;

pub use accountant::{Accountant, MceCore};
pub use config::Config;
pub use event::CeEvent;
pub use setup::setup;
