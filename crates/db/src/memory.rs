use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{SnapshotStore, StoreError};

/// Keeps the snapshot in process memory. Used by tests and ephemeral runs.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Mutex<Vec<T>>,
}

impl<T: Clone> MemoryStore<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Copy of the last saved snapshot.
    pub fn snapshot(&self) -> Vec<T> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl<T> SnapshotStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.snapshot())
    }

    async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
