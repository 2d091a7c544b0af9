//! Snapshot persistence for folio collections.
//!
//! Every store keeps a whole collection as one document: `load` returns the
//! complete collection and `save` replaces it. There are no partial updates.

use async_trait::async_trait;

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::{JsonFileStore, MissingFile};
pub use memory::MemoryStore;

/// A durable home for a complete collection of records.
#[async_trait]
pub trait SnapshotStore<T: Send + Sync>: Send + Sync {
    /// Read the full collection.
    async fn load(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the persisted collection with `records`.
    async fn save(&self, records: &[T]) -> Result<(), StoreError>;

    /// Human readable location, used in logs.
    fn describe(&self) -> String;
}
