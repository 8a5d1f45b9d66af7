//! TOML config loading. Logically external to the accounting core (see
//! SPEC_FULL.md §10.3): `mce_core::Config` only ever receives
//! already-resolved values.

use mce_core::Config;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("trigger path {path} is missing or not executable: {source}")]
    TriggerNotExecutable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = read(path)?;
    let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    for trigger_path in [&config.pre_soft_trigger_path, &config.post_soft_trigger_path] {
        if let Some(trigger_path) = trigger_path {
            check_executable(trigger_path)?;
        }
    }

    Ok(config)
}

pub(crate) fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn check_executable(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;

    let fail = |source| ConfigError::TriggerNotExecutable {
        path: path.display().to_string(),
        source,
    };

    let metadata = std::fs::metadata(path).map_err(fail)?;
    if metadata.permissions().mode() & 0o111 == 0 {
        return Err(fail(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied,
        )));
    }
    Ok(())
}
