use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};

/// Environment variable overriding [`AppConfig::dev_mode`].
pub const DEV_MODE_ENV: &str = "ESF_DEV_MODE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory for the structured store and the blob database.
    pub data_dir: PathBuf,
    /// Name of the blob database directory.
    pub database_name: String,
    /// Log persistence diagnostics as warnings.
    pub dev_mode: bool,
    /// Tip text shown until (and unless) the daily tip arrives.
    pub tip_placeholder: String,
    pub structured_quota_bytes: Option<u64>,
    pub blob_quota_bytes: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".esf"),
            database_name: "ESFFinancasDB".into(),
            dev_mode: cfg!(debug_assertions),
            tip_placeholder: esf_advisor::DEFAULT_PLACEHOLDER.into(),
            structured_quota_bytes: Some(5 * 1024 * 1024),
            blob_quota_bytes: None,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> StateResult<Self> {
        toml::from_str(text).map_err(|e| StateError::Config(e.to_string()))
    }

    /// Read `path` if it exists (defaults otherwise), then apply the
    /// environment override.
    pub fn load(path: &Path) -> StateResult<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(StateError::Config(format!("{}: {e}", path.display()))),
        };
        if let Ok(value) = std::env::var(DEV_MODE_ENV) {
            config.dev_mode = parse_flag(&value)?;
        }
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Directory holding the structured store's files.
    pub fn structured_dir(&self) -> PathBuf {
        self.data_dir.join("local-storage")
    }
}

fn parse_flag(value: &str) -> StateResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(StateError::Config(format!(
            "{DEV_MODE_ENV} must be a boolean, got {other:?}"
        ))),
    }
}
