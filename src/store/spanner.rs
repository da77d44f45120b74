use std::marker::PhantomData;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::RecordStore;
use crate::models::Record;
use crate::spanner::SpannerClient;

/// Records of type `R` stored as JSON documents in the `R::COLLECTION` table
pub struct SpannerStore<R> {
    client: SpannerClient,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SpannerStore<R> {
    pub fn new(client: SpannerClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    fn decode(data: &str) -> Result<R> {
        serde_json::from_str(data)
            .with_context(|| format!("Failed to deserialize {} row", R::COLLECTION))
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for SpannerStore<R> {
    async fn insert(&self, id: &str, value: R) -> Result<()> {
        let data = serde_json::to_string(&value).context("Failed to serialize record")?;
        self.client.upsert(R::COLLECTION, id, &data).await
    }

    async fn get(&self, id: &str) -> Result<Option<R>> {
        match self.client.read(R::COLLECTION, id).await? {
            Some(data) => Ok(Some(Self::decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn values(&self) -> Result<Vec<R>> {
        self.client
            .read_all(R::COLLECTION)
            .await?
            .iter()
            .map(|data| Self::decode(data))
            .collect()
    }

    async fn remove(&self, id: &str) -> Result<Option<R>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };
        self.client.delete(R::COLLECTION, id).await?;
        Ok(Some(existing))
    }

    async fn health_check(&self) -> Result<()> {
        self.client.health_check().await
    }
}
