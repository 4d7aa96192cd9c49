//! Settings persistence: the [`SettingsStore`] trait and its JSON-file
//! implementation.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// Abstraction over the persisted configuration mapping.
///
/// `merge` runs the whole read-modify-write under the implementation's own
/// lock, so concurrent partial updates interleave per call and cannot tear
/// each other. Trait methods surface failures as [`anyhow::Error`] so
/// callers stay decoupled from the backend's error type.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Return a full snapshot of the configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn snapshot(&self) -> Result<Map<String, Value>>;

    /// Shallow-merge the partial mapping into the document and persist it.
    /// Top-level keys in `partial` overwrite stored keys; keys absent from
    /// `partial` are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged document cannot be persisted.
    async fn merge(&self, partial: Map<String, Value>) -> Result<()>;
}

/// JSON-file-backed settings store.
///
/// The document is loaded once at construction and held in memory; every
/// merge rewrites the file through a temp-file rename so a crash mid-write
/// never leaves a truncated document behind.
pub struct ConfigStore {
    path: PathBuf,
    state: Mutex<Map<String, Value>>,
}

impl ConfigStore {
    /// Load the store from `path`, treating a missing file as an empty
    /// document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not contain a
    /// JSON object.
    pub async fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let state = match fs::read(&path).await {
            Ok(bytes) => parse_document(&bytes)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "settings file not found; starting empty");
                Map::new()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    operation: "store.read",
                    source,
                });
            }
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    async fn persist(&self, document: &Map<String, Value>) -> ConfigResult<()> {
        let payload =
            serde_json::to_vec_pretty(document).map_err(|source| ConfigError::Persist {
                operation: "store.serialize",
                source,
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    operation: "store.mkdir",
                    source,
                })?;
        }

        let staged = self.path.with_extension("json.tmp");
        fs::write(&staged, payload)
            .await
            .map_err(|source| ConfigError::Io {
                operation: "store.write",
                source,
            })?;
        fs::rename(&staged, &self.path)
            .await
            .map_err(|source| ConfigError::Io {
                operation: "store.rename",
                source,
            })?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for ConfigStore {
    async fn snapshot(&self) -> Result<Map<String, Value>> {
        Ok(self.state.lock().await.clone())
    }

    async fn merge(&self, partial: Map<String, Value>) -> Result<()> {
        let mut guard = self.state.lock().await;
        let mut merged = guard.clone();
        for (key, value) in partial {
            merged.insert(key, value);
        }
        // Commit to memory only after the file write succeeds, so a failed
        // persist never leaves snapshots reporting values the disk lost.
        self.persist(&merged).await?;
        *guard = merged;
        debug!(path = %self.path.display(), "settings merged and persisted");
        Ok(())
    }
}

fn parse_document(bytes: &[u8]) -> ConfigResult<Map<String, Value>> {
    match serde_json::from_slice(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::Malformed),
        Err(source) => Err(ConfigError::Persist {
            operation: "store.parse",
            source,
        }),
    }
}
