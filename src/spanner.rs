use anyhow::{Context, Result};
use gcloud_gax::conn::Environment;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update};
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use crate::config::SpannerConfig;

/// Shareable Spanner client for use across async handlers
///
/// Every collection lives in its own table with the layout
/// `(id STRING(36), data STRING(MAX), updated_at TIMESTAMP)`, where `data`
/// holds the record serialized as JSON.
#[derive(Clone)]
pub struct SpannerClient {
    inner: Arc<Client>,
}

impl SpannerClient {
    /// Create a new Spanner client from configuration
    ///
    /// Connects to the emulator when `emulator_host` is set, production
    /// Spanner otherwise. The instance, database and one table per entry in
    /// `tables` are created first if they don't exist.
    pub async fn from_config(config: &SpannerConfig, tables: &[&str]) -> Result<Self> {
        auto_provision(config, tables).await?;

        let database_path = config.database_path();

        let client_config = match &config.emulator_host {
            Some(host) => {
                tracing::info!("Connecting to Spanner emulator at: {}", host);
                ClientConfig {
                    environment: Environment::Emulator(host.clone()),
                    ..Default::default()
                }
            }
            None => {
                tracing::info!("Connecting to production Spanner");
                ClientConfig::default()
            }
        };

        let client = Client::new(&database_path, client_config)
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Insert or replace the JSON document stored under `id` in `table`
    pub async fn upsert(&self, table: &str, id: &str, data: &str) -> Result<()> {
        let mutation = insert_or_update(
            table,
            &["id", "data", "updated_at"],
            &[&id.to_string(), &data.to_string(), &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to upsert data to Spanner")?;

        tracing::debug!("Upserted {} row with id: {}", table, id);
        Ok(())
    }

    /// Read the JSON document stored under `id`, if any
    pub async fn read(&self, table: &str, id: &str) -> Result<Option<String>> {
        let mut statement = Statement::new(format!("SELECT data FROM {} WHERE id = @id", table));
        statement.add_param("id", &id.to_string());

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query data from Spanner")?;

        if let Some(row) = result_set.next().await? {
            let data: String = row.column_by_name("data")?;
            tracing::debug!("Read {} row with id: {}", table, id);
            Ok(Some(data))
        } else {
            tracing::debug!("No {} row with id: {}", table, id);
            Ok(None)
        }
    }

    /// Every JSON document in `table`, ordered by id
    pub async fn read_all(&self, table: &str) -> Result<Vec<String>> {
        let statement = Statement::new(format!("SELECT data FROM {} ORDER BY id ASC", table));

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query data from Spanner")?;

        let mut rows = Vec::new();
        while let Some(row) = result_set.next().await? {
            let data: String = row.column_by_name("data")?;
            rows.push(data);
        }

        tracing::debug!("Read {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    pub async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let mutation = delete(table, Key::new(&id.to_string()));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete data from Spanner")?;

        tracing::debug!("Deleted {} row with id: {}", table, id);
        Ok(())
    }

    /// Perform a health check by executing a simple query
    ///
    /// # Errors
    /// Returns an error if the Spanner query fails or if the transaction cannot be created
    pub async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Automatically provision Spanner instance, database, and tables
///
/// Checks whether the configured resources exist and creates them if needed,
/// so local development against the emulator needs no setup.
async fn auto_provision(config: &SpannerConfig, tables: &[&str]) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_config = match &config.emulator_host {
        Some(host) => AdminClientConfig {
            environment: Environment::Emulator(host.clone()),
            ..Default::default()
        },
        None => AdminClientConfig::default(),
    };

    let admin_client = AdminClient::new(admin_config)
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_tables_exist(&admin_client, &database_path, tables).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Ensure the Spanner instance exists, creating it if necessary
async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if config.emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

/// Ensure the Spanner database exists, creating it if necessary
async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

fn create_table_ddl(table: &str) -> String {
    format!(
        r#"
CREATE TABLE {} (
    id STRING(36) NOT NULL,
    data STRING(MAX) NOT NULL,
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#,
        table
    )
    .trim()
    .to_string()
}

/// Ensure a table exists for every collection, creating the missing ones in one DDL batch
async fn ensure_tables_exist(
    admin_client: &AdminClient,
    database_path: &str,
    tables: &[&str],
) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let existing = ddl_response.into_inner().statements;

    let statements: Vec<String> = tables
        .iter()
        .filter(|table| {
            let exists = existing.iter().any(|stmt| {
                stmt.contains(&format!("CREATE TABLE {} ", table))
                    || stmt.contains(&format!("CREATE TABLE `{}`", table))
            });
            if exists {
                tracing::info!("Table '{}' already exists", table);
            }
            !exists
        })
        .map(|table| {
            tracing::info!("Table '{}' not found, creating...", table);
            create_table_ddl(table)
        })
        .collect();

    if statements.is_empty() {
        return Ok(());
    }

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements,
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create tables")?;

    tracing::info!("Tables created successfully");
    Ok(())
}
