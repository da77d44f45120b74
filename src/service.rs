use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ApiError;
use crate::models::Record;
use crate::store::RecordStore;
use crate::validation::Validate;

/// CRUD operations over one record collection.
///
/// Assigns ids and timestamps on write. Mutations hold `write_lock`, so an
/// update's read-merge-write cannot interleave with another mutation of the
/// same collection.
pub struct RecordService<R: Record> {
    store: Arc<dyn RecordStore<R>>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl<R: Record> RecordService<R> {
    pub fn new(store: Arc<dyn RecordStore<R>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn create(&self, draft: R::Draft) -> Result<R, ApiError> {
        draft.validate()?;
        let _guard = self.write_lock.lock().await;

        let id = self.fresh_id().await?;
        let record = R::create(id.clone(), self.clock.now(), draft);
        self.store.insert(&id, record.clone()).await?;
        Ok(record)
    }

    pub async fn get_one(&self, id: &str) -> Result<R, ApiError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found::<R>(id))
    }

    pub async fn get_all(&self) -> Result<Vec<R>, ApiError> {
        Ok(self.store.values().await?)
    }

    /// Unknown ids are reported as not found before the patch is validated.
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<R, ApiError> {
        let _guard = self.write_lock.lock().await;

        let mut record = self.get_one(id).await?;
        patch.validate()?;
        record.merge(patch);
        record.touch(self.clock.now());
        self.store.insert(id, record.clone()).await?;
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<R, ApiError> {
        let _guard = self.write_lock.lock().await;

        self.store
            .remove(id)
            .await?
            .ok_or_else(|| ApiError::not_found::<R>(id))
    }

    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }

    /// A v4 UUID not currently in use in this collection
    async fn fresh_id(&self) -> Result<String> {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.store.get(&id).await?.is_none() {
                return Ok(id);
            }
            tracing::warn!("Generated {} id {} already in use, retrying", R::COLLECTION, id);
        }
    }
}
