//! Toy DIMM topology table loaded from the `[[dimm]]` entries of the same
//! config file. Standing in for the real topology database, which is
//! explicitly out of scope for this repository (SPEC_FULL.md §1).

use crate::config::ConfigError;
use mce_core::dimm::{DimmHandle, DimmKey, DimmTopology};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, serde::Deserialize)]
struct DimmEntry {
    socket: u8,
    channel: u8,
    dimm: u8,
    label: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct DimmFile {
    #[serde(default, rename = "dimm")]
    entries: Vec<DimmEntry>,
}

pub struct TableDimmTopology {
    table: HashMap<DimmKey, DimmHandle>,
}

impl TableDimmTopology {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = crate::config::read(path)?;
        let parsed: DimmFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        let table = parsed
            .entries
            .into_iter()
            .map(|entry| {
                (
                    DimmKey {
                        socket: entry.socket,
                        channel: entry.channel,
                        dimm: entry.dimm,
                    },
                    DimmHandle(entry.label),
                )
            })
            .collect();
        Ok(Self { table })
    }
}

impl DimmTopology for TableDimmTopology {
    fn lookup(&self, key: DimmKey) -> Option<DimmHandle> {
        self.table.get(&key).cloned()
    }
}
