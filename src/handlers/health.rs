use crate::error::{HealthResponse, UnhealthyResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health handler - Health check endpoint
///
/// Checks that both record stores are reachable.
/// Returns 200 OK if they are, 503 Service Unavailable otherwise.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<HealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    let result = match state.health_records.health_check().await {
        Ok(()) => state.insurance_policies.health_check().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            tracing::debug!("Health check passed");
            Ok((
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnhealthyResponse {
                    status: "unhealthy".to_string(),
                    error: format!("Cannot reach storage: {}", e),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::config::Config;
    use crate::models::{HealthRecord, InsurancePolicy};
    use crate::store::{FileStore, RecordStore};
    use async_trait::async_trait;
    use axum::{body::Body, http::Request, routing::get, Router};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// A store whose backend is always down
    struct UnreachableStore;

    #[async_trait]
    impl RecordStore<InsurancePolicy> for UnreachableStore {
        async fn insert(&self, _id: &str, _value: InsurancePolicy) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
        async fn get(&self, _id: &str) -> anyhow::Result<Option<InsurancePolicy>> {
            anyhow::bail!("connection refused")
        }
        async fn values(&self) -> anyhow::Result<Vec<InsurancePolicy>> {
            anyhow::bail!("connection refused")
        }
        async fn remove(&self, _id: &str) -> anyhow::Result<Option<InsurancePolicy>> {
            anyhow::bail!("connection refused")
        }
        async fn health_check(&self) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    async fn get_health(state: AppState) -> (StatusCode, Vec<u8>) {
        let app = Router::new()
            .route(crate::routes::HEALTH, get(health_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_endpoint_healthy() {
        let (status, body) = get_health(AppState::in_memory(Arc::new(SystemClock))).await;

        assert_eq!(status, StatusCode::OK);
        let response_json: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.status, "healthy");
    }

    #[tokio::test]
    async fn test_health_endpoint_unhealthy() {
        let state = AppState::with_stores(
            Config::default(),
            Arc::new(FileStore::<HealthRecord>::in_memory()),
            Arc::new(UnreachableStore),
            Arc::new(SystemClock),
        );

        let (status, body) = get_health(state).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let response_json: UnhealthyResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.status, "unhealthy");
        assert!(response_json.error.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_as_500() {
        let state = AppState::with_stores(
            Config::default(),
            Arc::new(FileStore::<HealthRecord>::in_memory()),
            Arc::new(UnreachableStore),
            Arc::new(SystemClock),
        );
        let app = crate::routes::router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/insurance-policies")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
