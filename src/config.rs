//! Configuration loading.
//!
//! Settings live in an optional `config.toml` inside the data directory. The data
//! directory itself comes from `--data-dir`, then `SDM_DATA_DIR`, then the platform
//! data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SDM_DATA_DIR";

/// File name of the optional settings file.
pub const CONFIG_FILE: &str = "config.toml";

/// Extension stepper bounds used by the shell.
pub const MIN_EXTEND_DAYS: i64 = 1;
pub const MAX_EXTEND_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Days added by `extend` when neither `--to` nor `--days` is given.
    #[serde(default = "default_extend_days")]
    pub default_extend_days: i64,

    /// Row limit for `list` when `--limit` is absent.
    #[serde(default)]
    pub list_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_extend_days: default_extend_days(),
            list_limit: None,
        }
    }
}

fn default_extend_days() -> i64 {
    7
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from the data directory, or defaults when it is absent.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if !(MIN_EXTEND_DAYS..=MAX_EXTEND_DAYS).contains(&self.default_extend_days) {
            return Err(Error::Config(format!(
                "default_extend_days must be between {MIN_EXTEND_DAYS} and {MAX_EXTEND_DAYS}, got {}",
                self.default_extend_days
            )));
        }
        if self.list_limit == Some(0) {
            return Err(Error::Config("list_limit cannot be 0".to_string()));
        }
        Ok(())
    }
}

/// Resolve the data directory from an explicit path, the environment, or the
/// platform default.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    directories::ProjectDirs::from("com", "soft-deadlines", "sdm").map_or_else(
        || PathBuf::from(".sdm"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}
