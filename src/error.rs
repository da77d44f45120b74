use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Not-found errors are rendered as plain text naming the record kind and id.
/// Everything else is rendered as a JSON `ErrorResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// No record with this id in the collection
    NotFound { noun: &'static str, id: String },
    /// Request body was malformed or failed validation
    InvalidInput(String),
    /// Storage backend operation failed
    StorageError(anyhow::Error),
}

impl ApiError {
    pub fn not_found<R: Record>(id: impl Into<String>) -> Self {
        ApiError::NotFound {
            noun: R::NOUN,
            id: id.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::InvalidInput(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound { noun, id } => {
                return (
                    StatusCode::NOT_FOUND,
                    format!("{} with id={} not found", noun, id),
                )
                    .into_response();
            }
            ApiError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, format!("Invalid input: {}", msg))
            }
            ApiError::StorageError(err) => {
                tracing::error!("Storage error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Storage error: {}", err),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StorageError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HealthRecord;

    async fn body_string(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_is_plain_text() {
        let response = ApiError::not_found::<HealthRecord>("abc").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(
            body_string(response).await,
            "Health record with id=abc not found"
        );
    }

    #[tokio::test]
    async fn test_invalid_input_is_json() {
        let response = ApiError::invalid("patientName must not be empty").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        let error: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert!(error.error.contains("patientName must not be empty"));
    }

    #[tokio::test]
    async fn test_storage_error_is_500() {
        let response = ApiError::from(anyhow::anyhow!("disk full")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        let error: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert!(error.error.contains("disk full"));
    }
}
