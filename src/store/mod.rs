pub mod file;
pub mod spanner;

pub use file::FileStore;
pub use spanner::SpannerStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Record;

/// Ordered, persistent map from record id to record.
///
/// Absence is reported as `None`; `Err` is reserved for backend failures.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Insert or overwrite the entry for `id`
    async fn insert(&self, id: &str, value: R) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<R>>;

    /// Snapshot of every stored record, in key order
    async fn values(&self) -> Result<Vec<R>>;

    /// Delete the entry for `id`, returning what was removed
    async fn remove(&self, id: &str) -> Result<Option<R>>;

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
