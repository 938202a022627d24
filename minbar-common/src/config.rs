//! Configuration loading and resolution
//!
//! Per-field priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MINBAR_*`)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Root of the public document tree (uploads live under it)
    pub public_dir: PathBuf,
    /// Payment processor API base URL
    pub payment_api_url: String,
    /// Payment processor secret key (payments are disabled without it)
    pub payment_api_key: Option<String>,
    /// Geolocation provider API base URL
    pub geoip_api_url: String,
    /// Per-candidate probe timeout for audio source resolution
    pub probe_timeout_ms: u64,
    /// Login page advertised to unauthenticated callers
    pub login_url: String,
}

/// Command-line overrides (highest priority tier)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
}

/// On-disk configuration file shape (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub payment_api_url: Option<String>,
    pub payment_api_key: Option<String>,
    pub geoip_api_url: Option<String>,
    pub probe_timeout_ms: Option<u64>,
    pub login_url: Option<String>,
}

impl Config {
    /// Resolve configuration from all four tiers
    ///
    /// An explicitly named config file must load; a discovered one is
    /// best-effort. Environment variables that fail to parse are warned
    /// about and skipped rather than aborting startup.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let file = match &overrides.config_file {
            Some(path) => load_toml_config(path)?,
            None => match default_config_file() {
                Some(path) => load_toml_config(&path).unwrap_or_else(|e| {
                    warn!("Ignoring unreadable config file: {}", e);
                    TomlConfig::default()
                }),
                None => TomlConfig::default(),
            },
        };

        Ok(Self {
            host: env_string("MINBAR_HOST")
                .or(file.host)
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            port: overrides
                .port
                .or_else(|| env_parse("MINBAR_PORT"))
                .or(file.port)
                .unwrap_or(5730),
            database_path: overrides
                .database
                .clone()
                .or_else(|| env_string("MINBAR_DATABASE").map(PathBuf::from))
                .or(file.database)
                .unwrap_or_else(|| PathBuf::from("data/minbar.db")),
            public_dir: overrides
                .public_dir
                .clone()
                .or_else(|| env_string("MINBAR_PUBLIC_DIR").map(PathBuf::from))
                .or(file.public_dir)
                .unwrap_or_else(|| PathBuf::from("public")),
            payment_api_url: env_string("MINBAR_PAYMENT_API_URL")
                .or(file.payment_api_url)
                .unwrap_or_else(|| "https://api.moyasar.com/v1".to_string()),
            payment_api_key: env_string("MINBAR_PAYMENT_API_KEY").or(file.payment_api_key),
            geoip_api_url: env_string("MINBAR_GEOIP_API_URL")
                .or(file.geoip_api_url)
                .unwrap_or_else(|| "http://ip-api.com/json".to_string()),
            probe_timeout_ms: env_parse("MINBAR_PROBE_TIMEOUT_MS")
                .or(file.probe_timeout_ms)
                .unwrap_or(5000),
            login_url: env_string("MINBAR_LOGIN_URL")
                .or(file.login_url)
                .unwrap_or_else(|| "/login".to_string()),
        })
    }
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Locate the default config file, if any
///
/// Checks `~/.config/minbar/minbar.toml` first, then `./minbar.toml`.
fn default_config_file() -> Option<PathBuf> {
    if let Some(dir) = dirs::config_dir() {
        let path = dir.join("minbar").join("minbar.toml");
        if path.exists() {
            return Some(path);
        }
    }
    let local = PathBuf::from("minbar.toml");
    if local.exists() {
        return Some(local);
    }
    None
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}: {:?}", name, raw);
            None
        }
    }
}
