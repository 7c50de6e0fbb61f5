//! Configuration file loading
//!
//! Config precedence: CLI `--config` > `CONFIG_PATH` env var > default path.
//! Passwords are loaded from `HUBSCORE_<CATEGORY>_PASSWORD` or the
//! category's `password_file`, never stored in the TOML directly.

use common::Secret;
use hubscore_client::{Category, ClientConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub hubscore: ClientConfig,
}

/// Env var holding a category's password.
pub fn password_env_var(category: Category) -> String {
    format!("HUBSCORE_{}_PASSWORD", category.as_str().to_ascii_uppercase())
}

impl Config {
    /// Load configuration from a TOML file, then resolve passwords.
    ///
    /// Password resolution order, per category:
    /// 1. `HUBSCORE_<CATEGORY>_PASSWORD` env var
    /// 2. `password_file` path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        for (category, entry) in config.hubscore.credentials.iter_mut() {
            if let Ok(password) = std::env::var(password_env_var(*category)) {
                entry.password = Some(Secret::new(password));
            } else if let Some(ref file) = entry.password_file {
                let password = std::fs::read_to_string(file).map_err(|e| {
                    common::Error::Config(format!(
                        "failed to read password_file {}: {e}",
                        file.display()
                    ))
                })?;
                let password = password.trim().to_owned();
                if !password.is_empty() {
                    entry.password = Some(Secret::new(password));
                }
            }
        }

        config.hubscore.validate()?;
        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("hubscore-sync.toml")
    }
}
