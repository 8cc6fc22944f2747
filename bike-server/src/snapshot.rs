//! Local JSON snapshot of the station collection.
//!
//! The snapshot is a plain JSON array of stations, the same shape as the
//! seed data file. It is a fallback cache, not a system of record.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::Station;

/// Default snapshot location, relative to the working directory.
const DEFAULT_PATH: &str = "data/dublinbike.json";

/// Errors writing the snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Serialising the collection failed
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Filesystem operation failed
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The blocking write task panicked or was cancelled
    #[error("snapshot write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration for the snapshot store.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Path to the snapshot file.
    pub path: PathBuf,
    /// Write indented JSON.
    pub pretty: bool,
}

impl SnapshotConfig {
    /// Create a config for the given path with pretty printing on.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    /// Toggle indented output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

/// Reads and writes the station snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    config: SnapshotConfig,
}

impl SnapshotStore {
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }

    /// Load all stations from the snapshot.
    ///
    /// A missing or unparsable file yields an empty collection.
    pub fn load(&self) -> Vec<Station> {
        let path = &self.config.path;

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot unreadable, using empty collection");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Station>>(&contents) {
            Ok(stations) => {
                debug!(path = %path.display(), count = stations.len(), "loaded snapshot");
                stations
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot malformed, using empty collection");
                Vec::new()
            }
        }
    }

    /// Overwrite the snapshot with `stations`.
    ///
    /// Creates parent directories if needed. The file is written to a
    /// sibling temporary path and renamed into place, so a concurrent
    /// reader never sees a half-written file.
    pub fn save(&self, stations: &[Station]) -> Result<(), SnapshotError> {
        let path = &self.config.path;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
                action: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = if self.config.pretty {
            serde_json::to_string_pretty(stations)?
        } else {
            serde_json::to_string(stations)?
        };

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| SnapshotError::Io {
            action: "write",
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, path).map_err(|source| SnapshotError::Io {
            action: "replace",
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), count = stations.len(), "saved snapshot");
        Ok(())
    }

    /// Run [`load`](Self::load) on the blocking thread pool.
    pub async fn load_off_runtime(&self) -> Vec<Station> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "snapshot load task failed, using empty collection");
                Vec::new()
            })
    }

    /// Run [`save`](Self::save) on the blocking thread pool.
    pub async fn save_off_runtime(
        &self,
        stations: Arc<Vec<Station>>,
    ) -> Result<(), SnapshotError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.save(&stations)).await?
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}
