//! Service settings.
//!
//! Resolution order, later wins:
//!
//! 1. built-in defaults (database under `~/.song-library`)
//! 2. TOML file at `$SONG_LIBRARY_CONFIG`, else `<config dir>/song-library/config.toml`
//! 3. `SONG_LIBRARY_*` environment variables

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::db::default_db_path;

pub const CONFIG_PATH_VAR: &str = "SONG_LIBRARY_CONFIG";
pub const LISTEN_VAR: &str = "SONG_LIBRARY_LISTEN";
pub const DB_VAR: &str = "SONG_LIBRARY_DB";
pub const API_URL_VAR: &str = "SONG_LIBRARY_API_URL";
pub const API_TIMEOUT_VAR: &str = "SONG_LIBRARY_API_TIMEOUT";

const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
const DEFAULT_API_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_path: PathBuf,
    /// Base URL of the song-info API. `None` disables enrichment.
    pub metadata_api_url: Option<String>,
    pub metadata_timeout: Duration,
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    listen_addr: Option<String>,
    database_path: Option<PathBuf>,
    metadata_api_url: Option<String>,
    metadata_timeout_secs: Option<u64>,
}

impl Config {
    /// Load from the default file location and the process environment.
    pub fn load() -> Result<Self> {
        let file = match env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Some(PathBuf::from(path)),
            None => default_config_path().filter(|p| p.exists()),
        };
        Self::resolve(file.as_deref(), |key| env::var(key).ok())
    }

    /// Layer the optional file and the variables returned by `lookup` over the
    /// defaults.
    pub fn resolve(file: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let parsed = match file {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str::<ConfigFile>(&contents)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => ConfigFile::default(),
        };

        let listen = lookup(LISTEN_VAR)
            .or(parsed.listen_addr)
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen_addr: SocketAddr = listen
            .parse()
            .with_context(|| format!("invalid listen address {listen:?}"))?;

        let database_path = match lookup(DB_VAR).map(PathBuf::from).or(parsed.database_path) {
            Some(path) => path,
            None => default_db_path()?,
        };

        let metadata_api_url = lookup(API_URL_VAR)
            .or(parsed.metadata_api_url)
            .filter(|url| !url.trim().is_empty());

        let timeout_secs: u64 = match lookup(API_TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {API_TIMEOUT_VAR} value {raw:?}"))?,
            None => parsed
                .metadata_timeout_secs
                .unwrap_or(DEFAULT_API_TIMEOUT_SECS),
        };

        Ok(Self {
            listen_addr,
            database_path,
            metadata_api_url,
            metadata_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "song-library").map(|dirs| dirs.config_dir().join("config.toml"))
}
