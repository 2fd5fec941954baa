//! Whole-document storage trait.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::UserStoreResult;

/// Storage for a single serialized document.
///
/// Implementations read and write the document as a whole; there are no
/// partial updates.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads the document. A store that holds nothing yet yields
    /// `T::default()`.
    async fn read<T>(&self) -> UserStoreResult<T>
    where
        T: DeserializeOwned + Default + Send;

    /// Replaces the stored document.
    async fn write<T>(&self, document: &T) -> UserStoreResult<()>
    where
        T: Serialize + Sync;
}
