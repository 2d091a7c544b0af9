use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::{SnapshotStore, StoreError};

/// What to do when the backing file does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFile {
    /// Treat a missing file as an empty collection.
    Empty,
    /// Report the missing file as an I/O error.
    Error,
}

/// Accepted on-disk layouts. Writes always produce `List`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot<T> {
    List(Vec<T>),
    Keyed(BTreeMap<String, T>),
}

impl<T> Snapshot<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            Snapshot::List(records) => records,
            Snapshot::Keyed(records) => records.into_values().collect(),
        }
    }
}

/// Stores a collection as a pretty-printed JSON array.
///
/// Saves write a sibling `*.tmp` file, fsync it, then rename it over the
/// target so readers never observe a half-written snapshot.
pub struct JsonFileStore<T> {
    path: PathBuf,
    missing: MissingFile,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>, missing: MissingFile) -> Self {
        Self {
            path: path.into(),
            missing,
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl<T> SnapshotStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err)
                if err.kind() == std::io::ErrorKind::NotFound
                    && self.missing == MissingFile::Empty =>
            {
                tracing::debug!(path = %self.path.display(), "snapshot missing, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let snapshot: Snapshot<T> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        Ok(snapshot.into_records())
    }

    async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        file.write_all(&encoded)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "snapshot written"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
