use std::env;
use std::path::PathBuf;
use anyhow::{Context, Result, bail};

/// Connection settings for the Spanner backend
#[derive(Debug, Clone, PartialEq)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl SpannerConfig {
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}

/// Where record collections are persisted
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    /// One JSON file per collection under `data_dir`
    File { data_dir: PathBuf },
    Spanner(SpannerConfig),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub service_port: u16,
    pub service_host: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageBackend::File {
                data_dir: PathBuf::from("./data"),
            },
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "file".to_string());

        let storage = match backend.as_str() {
            "file" => StorageBackend::File {
                data_dir: PathBuf::from(
                    env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
                ),
            },
            "spanner" => StorageBackend::Spanner(spanner_from_env()?),
            other => bail!(
                "STORAGE_BACKEND must be one of: file, spanner, got '{}'",
                other
            ),
        };

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            storage,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.storage {
            StorageBackend::File { data_dir } => {
                tracing::info!("  Storage: JSON files in {}", data_dir.display());
            }
            StorageBackend::Spanner(spanner) => {
                tracing::info!("  Storage: Spanner");
                tracing::info!("  Spanner emulator: {}",
                    spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
                tracing::info!("  Spanner project: {}", spanner.project);
                tracing::info!("  Spanner instance: {}", spanner.instance);
                tracing::info!("  Spanner database: {}", spanner.database);
            }
        }
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

fn spanner_from_env() -> Result<SpannerConfig> {
    let emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

    let project = env::var("SPANNER_PROJECT")
        .context("SPANNER_PROJECT environment variable is required")?;

    let instance = env::var("SPANNER_INSTANCE")
        .context("SPANNER_INSTANCE environment variable is required")?;

    let database = env::var("SPANNER_DATABASE")
        .context("SPANNER_DATABASE environment variable is required")?;

    Ok(SpannerConfig {
        emulator_host,
        project,
        instance,
        database,
    })
}
