use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKBOARD_CONFIG_PATH";
const HOST_ENV_VAR: &str = "TASKBOARD_HOST";

/// External configuration: the base address of the collection service.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub host: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<SyncError>,
}

pub fn config_path() -> Result<PathBuf, SyncError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata = std::env::var("APPDATA")
            .map_err(|_| SyncError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("taskboard")
            .join(CONFIG_FILE_NAME))
    } else {
        let home =
            std::env::var("HOME").map_err(|_| SyncError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskboard")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, SyncError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| SyncError::invalid_data(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        SyncError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

/// Resolve the service base address: the `TASKBOARD_HOST` env var wins,
/// otherwise the `host` field of the config file. A broken config file is an
/// error here rather than a silent fallback, since there is no usable
/// default host.
pub fn resolve_host() -> Result<String, SyncError> {
    if let Ok(host) = std::env::var(HOST_ENV_VAR)
        && !host.trim().is_empty()
    {
        return Ok(normalize_host(&host));
    }

    let load = load_config_with_fallback();
    if let Some(err) = load.error {
        return Err(err);
    }
    host_from_config(&load.config)
}

fn host_from_config(config: &Config) -> Result<String, SyncError> {
    match config.host.as_deref() {
        Some(host) if !host.trim().is_empty() => Ok(normalize_host(host)),
        _ => Err(SyncError::invalid_input(
            "no host configured; set TASKBOARD_HOST or add \"host\" to config.json",
        )),
    }
}

fn normalize_host(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
