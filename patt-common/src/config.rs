//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Default TCP port for the API service
pub const DEFAULT_PORT: u16 = 5850;

/// Resolved service settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Folder holding the database and any future on-disk state
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Resolve settings from CLI arguments, environment, config file, and
    /// compiled defaults (highest priority first):
    /// 1. Command-line argument
    /// 2. Environment variable (`PATT_ROOT`, `PATT_HOST`, `PATT_PORT`)
    /// 3. TOML config file (`root_folder`, `host`, `port` keys)
    /// 4. Compiled default
    pub fn resolve(cli_root: Option<&str>, cli_port: Option<u16>) -> Settings {
        let file = load_config_file().ok();

        let root_folder = cli_root
            .map(PathBuf::from)
            .or_else(|| std::env::var("PATT_ROOT").ok().map(PathBuf::from))
            .or_else(|| {
                file.as_ref()
                    .and_then(|c| c.get("root_folder"))
                    .and_then(|v| v.as_str())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(default_root_folder);

        let host = std::env::var("PATT_HOST")
            .ok()
            .or_else(|| {
                file.as_ref()
                    .and_then(|c| c.get("host"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "127.0.0.1".to_string());

        let port = cli_port
            .or_else(|| {
                std::env::var("PATT_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
            })
            .or_else(|| {
                file.as_ref()
                    .and_then(|c| c.get("port"))
                    .and_then(|v| v.as_integer())
                    .and_then(|p| u16::try_from(p).ok())
            })
            .unwrap_or(DEFAULT_PORT);

        Settings { root_folder, host, port }
    }

    /// Path of the sqlite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("patt.db")
    }

    /// Create the root folder if it does not exist yet
    pub fn ensure_root_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }
}

/// Load the platform config file, if one exists
fn load_config_file() -> Result<toml::Value> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Platform config file location: `<config dir>/patt/config.toml`, with
/// `/etc/patt/config.toml` as a system-wide fallback on Linux
fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("patt").join("config.toml")) {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/patt/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("patt"))
        .unwrap_or_else(|| PathBuf::from("./patt_data"))
}
