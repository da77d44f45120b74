use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use super::RecordStore;
use crate::models::Record;

/// JSON file-backed record map.
///
/// Keeps a `BTreeMap<id, R>` in memory and rewrites the whole file after
/// every mutation. Without a path it is a plain in-memory map.
pub struct FileStore<R> {
    entries: RwLock<BTreeMap<String, R>>,
    path: Option<PathBuf>,
}

impl<R: Record> FileStore<R> {
    /// A store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            path: None,
        }
    }

    /// Load the store from `path`, creating the file with an empty map if missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }

        let entries: BTreeMap<String, R> = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = BTreeMap::new();
                write_atomically(&path, &empty).await?;
                empty
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        tracing::debug!(
            "Opened {} with {} {} entries",
            path.display(),
            entries.len(),
            R::COLLECTION
        );

        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, R>) -> Result<()> {
        match &self.path {
            Some(path) => write_atomically(path, entries).await,
            None => Ok(()),
        }
    }
}

async fn write_atomically<R: Record>(path: &Path, entries: &BTreeMap<String, R>) -> Result<()> {
    let data = serde_json::to_vec(entries).context("Failed to serialize records")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl<R: Record> RecordStore<R> for FileStore<R> {
    async fn insert(&self, id: &str, value: R) -> Result<()> {
        let mut entries = self.entries.write().await;
        let previous = entries.insert(id.to_string(), value);

        // Roll the map back if the file could not be written
        if let Err(e) = self.persist(&entries).await {
            match previous {
                Some(old) => entries.insert(id.to_string(), old),
                None => entries.remove(id),
            };
            return Err(e);
        }

        tracing::debug!("Inserted {} entry with id: {}", R::COLLECTION, id);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        let entries = self.entries.read().await;
        Ok(entries.get(id).cloned())
    }

    async fn values(&self) -> Result<Vec<R>> {
        let entries = self.entries.read().await;
        Ok(entries.values().cloned().collect())
    }

    async fn remove(&self, id: &str) -> Result<Option<R>> {
        let mut entries = self.entries.write().await;
        let Some(removed) = entries.remove(id) else {
            return Ok(None);
        };

        if let Err(e) = self.persist(&entries).await {
            entries.insert(id.to_string(), removed);
            return Err(e);
        }

        tracing::debug!("Removed {} entry with id: {}", R::COLLECTION, id);
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthRecord, HealthRecordDraft};
    use chrono::Utc;
    use uuid::Uuid;

    fn record(id: &str, name: &str) -> HealthRecord {
        HealthRecord::create(
            id.to_string(),
            Utc::now(),
            HealthRecordDraft {
                patient_name: name.to_string(),
                date_of_birth: "1990-01-01".to_string(),
                medical_history: "none".to_string(),
            },
        )
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("medshield_store_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_in_memory_crud() -> Result<()> {
        let store = FileStore::<HealthRecord>::in_memory();

        assert!(store.values().await?.is_empty());
        assert_eq!(store.get("missing").await?, None);
        assert_eq!(store.remove("missing").await?, None);

        store.insert("b", record("b", "Bob")).await?;
        store.insert("a", record("a", "Alice")).await?;

        assert_eq!(store.get("a").await?.unwrap().patient_name, "Alice");

        // Key order, not insertion order
        let ids: Vec<String> = store.values().await?.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        // Overwrite
        store.insert("a", record("a", "Alicia")).await?;
        assert_eq!(store.get("a").await?.unwrap().patient_name, "Alicia");
        assert_eq!(store.values().await?.len(), 2);

        let removed = store.remove("a").await?;
        assert_eq!(removed.unwrap().patient_name, "Alicia");
        assert_eq!(store.get("a").await?, None);
        assert_eq!(store.values().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() -> Result<()> {
        let path = temp_path();
        let store = FileStore::<HealthRecord>::open(&path).await?;
        assert!(store.values().await?.is_empty());

        let alice = record("a", "Alice");
        store.insert("a", alice.clone()).await?;
        store.insert("b", record("b", "Bob")).await?;
        store.remove("b").await?;

        let reopened = FileStore::<HealthRecord>::open(&path).await?;
        let values = reopened.values().await?;
        assert_eq!(values, vec![alice]);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() -> Result<()> {
        let path = temp_path();
        tokio::fs::write(&path, b"{not json").await?;

        let result = FileStore::<HealthRecord>::open(&path).await;
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("Failed to parse"));

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_leaves_map_unchanged() -> Result<()> {
        let path = temp_path();
        let store = FileStore::<HealthRecord>::open(&path).await?;
        let alice = record("a", "Alice");
        store.insert("a", alice.clone()).await?;

        // A directory where the temp file goes makes every write fail
        let tmp = path.with_extension("json.tmp");
        tokio::fs::create_dir(&tmp).await?;

        assert!(store.insert("b", record("b", "Bob")).await.is_err());
        assert!(store.insert("a", record("a", "Alicia")).await.is_err());
        assert!(store.remove("a").await.is_err());
        assert_eq!(store.values().await?, vec![alice.clone()]);

        // Nothing reached disk either
        tokio::fs::remove_dir(&tmp).await?;
        let reopened = FileStore::<HealthRecord>::open(&path).await?;
        assert_eq!(reopened.values().await?, vec![alice]);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_health_check_ok() -> Result<()> {
        let store = FileStore::<HealthRecord>::in_memory();
        store.health_check().await
    }
}
