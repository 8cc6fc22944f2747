//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::snapshot::SnapshotConfig;
use crate::store::HttpStoreConfig;

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default snapshot location.
const DEFAULT_SNAPSHOT_PATH: &str = "data/dublinbike.json";

/// Default document store timeout in seconds.
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: {message}")]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

/// Where the primary store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store, seeded from the snapshot.
    Memory,
    /// REST document store.
    Http {
        url: String,
        api_key: String,
        timeout_secs: u64,
    },
}

impl StoreBackend {
    /// Client configuration for the HTTP backend.
    pub fn http_config(&self) -> Option<HttpStoreConfig> {
        match self {
            StoreBackend::Memory => None,
            StoreBackend::Http {
                url,
                api_key,
                timeout_secs,
            } => Some(
                HttpStoreConfig::new(url.as_str())
                    .with_api_key(api_key.as_str())
                    .with_timeout(*timeout_secs),
            ),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Snapshot file used for fallback and write-through.
    pub snapshot_path: PathBuf,

    /// Primary store backend.
    pub store: StoreBackend,

    /// Upsert the snapshot into the primary at startup.
    pub seed: bool,

    /// Run the background refresher.
    pub refresh: bool,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIKES_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError {
                var: "BIKES_BIND_ADDR",
                message: e.to_string(),
            })?;

        let snapshot_path = get("BIKES_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));

        let store = match get("BIKES_STORE_URL") {
            None => StoreBackend::Memory,
            Some(url) => {
                let timeout_secs = match get("BIKES_STORE_TIMEOUT_SECS") {
                    None => DEFAULT_STORE_TIMEOUT_SECS,
                    Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError {
                        var: "BIKES_STORE_TIMEOUT_SECS",
                        message: format!("expected a whole number of seconds, got {raw:?}"),
                    })?,
                };
                StoreBackend::Http {
                    url,
                    api_key: get("BIKES_STORE_API_KEY").unwrap_or_default(),
                    timeout_secs,
                }
            }
        };

        Ok(Self {
            bind_addr,
            snapshot_path,
            store,
            seed: parse_flag("BIKES_SEED", get("BIKES_SEED"), true)?,
            refresh: parse_flag("BIKES_REFRESH", get("BIKES_REFRESH"), true)?,
        })
    }

    /// Snapshot store configuration.
    pub fn snapshot_config(&self) -> SnapshotConfig {
        SnapshotConfig::new(&self.snapshot_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            store: StoreBackend::Memory,
            seed: true,
            refresh: true,
        }
    }
}

fn parse_flag(
    var: &'static str,
    value: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var,
            message: format!("expected true or false, got {raw:?}"),
        }),
    }
}
