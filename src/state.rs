use crate::clock::{Clock, SystemClock};
use crate::config::{Config, StorageBackend};
use crate::models::{HealthRecord, InsurancePolicy, Record};
use crate::service::RecordService;
use crate::spanner::SpannerClient;
use crate::store::{FileStore, RecordStore, SpannerStore};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_records: Arc<RecordService<HealthRecord>>,
    pub insurance_policies: Arc<RecordService<InsurancePolicy>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the configured storage backend and build one service per collection
    pub async fn from_config(config: Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let (health_store, policy_store): (
            Arc<dyn RecordStore<HealthRecord>>,
            Arc<dyn RecordStore<InsurancePolicy>>,
        ) = match &config.storage {
            StorageBackend::File { data_dir } => {
                let health_path = collection_file::<HealthRecord>(data_dir);
                let policy_path = collection_file::<InsurancePolicy>(data_dir);
                (
                    Arc::new(FileStore::<HealthRecord>::open(health_path).await?),
                    Arc::new(FileStore::<InsurancePolicy>::open(policy_path).await?),
                )
            }
            StorageBackend::Spanner(spanner) => {
                let client = SpannerClient::from_config(
                    spanner,
                    &[HealthRecord::COLLECTION, InsurancePolicy::COLLECTION],
                )
                .await?;
                (
                    Arc::new(SpannerStore::<HealthRecord>::new(client.clone())),
                    Arc::new(SpannerStore::<InsurancePolicy>::new(client)),
                )
            }
        };

        Ok(Self::with_stores(config, health_store, policy_store, clock))
    }

    pub fn with_stores(
        config: Config,
        health_store: Arc<dyn RecordStore<HealthRecord>>,
        policy_store: Arc<dyn RecordStore<InsurancePolicy>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            health_records: Arc::new(RecordService::new(health_store, clock.clone())),
            insurance_policies: Arc::new(RecordService::new(policy_store, clock)),
            config: Arc::new(config),
        }
    }

    /// Non-persistent state for tests
    #[cfg(test)]
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::with_stores(
            Config::default(),
            Arc::new(FileStore::<HealthRecord>::in_memory()),
            Arc::new(FileStore::<InsurancePolicy>::in_memory()),
            clock,
        )
    }
}

fn collection_file<R: Record>(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{}.json", R::COLLECTION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HealthRecordDraft;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_file_backend_state_survives_restart() {
        let data_dir = std::env::temp_dir().join(format!("medshield_state_{}", Uuid::new_v4()));
        let config = Config {
            storage: StorageBackend::File {
                data_dir: data_dir.clone(),
            },
            ..Config::default()
        };

        let state = AppState::from_config(config.clone()).await.unwrap();
        let created = state
            .health_records
            .create(HealthRecordDraft {
                patient_name: "Alice".to_string(),
                date_of_birth: "1990-01-01".to_string(),
                medical_history: "none".to_string(),
            })
            .await
            .unwrap();

        // Simulated restart: reopen from the same directory
        let restarted = AppState::from_config(config).await.unwrap();
        let fetched = restarted.health_records.get_one(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert!(restarted.insurance_policies.get_all().await.unwrap().is_empty());

        assert!(data_dir.join("health_records.json").exists());
        assert!(data_dir.join("insurance_policies.json").exists());

        let _ = tokio::fs::remove_dir_all(&data_dir).await;
    }
}
