//! In-memory document store implementation for testing.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{DocumentStore, UserStoreResult};

/// In-memory document store for testing purposes.
///
/// The document is kept in its JSON form so that reads and writes go through
/// the same serde round trip as the file store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    document: RwLock<Option<Value>>,
}

impl MemoryDocumentStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `document`.
    pub fn with_document<T: Serialize>(document: &T) -> UserStoreResult<Self> {
        Ok(Self {
            document: RwLock::new(Some(serde_json::to_value(document)?)),
        })
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read<T>(&self) -> UserStoreResult<T>
    where
        T: DeserializeOwned + Default + Send,
    {
        let document = self.document.read().await;
        match document.as_ref() {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(T::default()),
        }
    }

    async fn write<T>(&self, document: &T) -> UserStoreResult<()>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(document)?;
        *self.document.write().await = Some(value);
        Ok(())
    }
}
