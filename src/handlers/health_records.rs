use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::crud;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{HealthRecord, HealthRecordDraft, HealthRecordPatch};
use crate::routes;
use crate::state::AppState;

/// POST /health-records - Create a health record
#[utoipa::path(
    post,
    path = routes::HEALTH_RECORDS,
    request_body = HealthRecordDraft,
    responses(
        (status = 200, description = "Health record created", body = HealthRecord),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "health-records"
)]
pub async fn create_health_record(
    State(state): State<AppState>,
    payload: Result<Json<HealthRecordDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<HealthRecord>), ApiError> {
    crud::create(&state.health_records, payload).await
}

/// GET /health-records - List all health records
#[utoipa::path(
    get,
    path = routes::HEALTH_RECORDS,
    responses(
        (status = 200, description = "All health records", body = Vec<HealthRecord>),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "health-records"
)]
pub async fn list_health_records(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<HealthRecord>>), ApiError> {
    crud::list(&state.health_records).await
}

/// GET /health-records/{id} - Retrieve a health record
#[utoipa::path(
    get,
    path = routes::HEALTH_RECORD_ITEM,
    params(("id" = String, Path, description = "Health record id")),
    responses(
        (status = 200, description = "Health record found", body = HealthRecord),
        (status = 404, description = "Health record not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "health-records"
)]
pub async fn get_health_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<HealthRecord>), ApiError> {
    crud::get_one(&state.health_records, id).await
}

/// PUT /health-records/{id} - Update some fields of a health record
#[utoipa::path(
    put,
    path = routes::HEALTH_RECORD_ITEM,
    params(("id" = String, Path, description = "Health record id")),
    request_body = HealthRecordPatch,
    responses(
        (status = 200, description = "Health record updated", body = HealthRecord),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Health record not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "health-records"
)]
pub async fn update_health_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<HealthRecordPatch>, JsonRejection>,
) -> Result<(StatusCode, Json<HealthRecord>), ApiError> {
    crud::update(&state.health_records, id, payload).await
}

/// DELETE /health-records/{id} - Delete a health record
#[utoipa::path(
    delete,
    path = routes::HEALTH_RECORD_ITEM,
    params(("id" = String, Path, description = "Health record id")),
    responses(
        (status = 200, description = "Health record deleted; body is the removed record", body = HealthRecord),
        (status = 404, description = "Health record not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "health-records"
)]
pub async fn delete_health_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<HealthRecord>), ApiError> {
    crud::delete(&state.health_records, id).await
}
