//! JSON file document store.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{DocumentStore, UserStoreResult};

/// Document store backed by a single pretty-printed JSON file.
///
/// Writes truncate and rewrite the file. There is no locking or atomic
/// rename here; callers that mutate must serialize access themselves.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the file at `path`. The file does not need to
    /// exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn read<T>(&self) -> UserStoreResult<T>
    where
        T: DeserializeOwned + Default + Send,
    {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Document file missing, using empty document");
                return Ok(T::default());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write<T>(&self, document: &T) -> UserStoreResult<()>
    where
        T: Serialize + Sync,
    {
        let bytes = serde_json::to_vec_pretty(document)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, bytes).await?;

        debug!(path = %self.path.display(), "Document written");
        Ok(())
    }
}
