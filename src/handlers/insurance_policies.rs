use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::crud;
use crate::error::{ApiError, ErrorResponse};
use crate::models::{InsurancePolicy, InsurancePolicyDraft, InsurancePolicyPatch};
use crate::routes;
use crate::state::AppState;

/// POST /insurance-policies - Create an insurance policy
#[utoipa::path(
    post,
    path = routes::INSURANCE_POLICIES,
    request_body = InsurancePolicyDraft,
    responses(
        (status = 200, description = "Insurance policy created", body = InsurancePolicy),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "insurance-policies"
)]
pub async fn create_insurance_policy(
    State(state): State<AppState>,
    payload: Result<Json<InsurancePolicyDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<InsurancePolicy>), ApiError> {
    crud::create(&state.insurance_policies, payload).await
}

/// GET /insurance-policies - List all insurance policies
#[utoipa::path(
    get,
    path = routes::INSURANCE_POLICIES,
    responses(
        (status = 200, description = "All insurance policies", body = Vec<InsurancePolicy>),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "insurance-policies"
)]
pub async fn list_insurance_policies(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<InsurancePolicy>>), ApiError> {
    crud::list(&state.insurance_policies).await
}

/// GET /insurance-policies/{id} - Retrieve an insurance policy
#[utoipa::path(
    get,
    path = routes::INSURANCE_POLICY_ITEM,
    params(("id" = String, Path, description = "Insurance policy id")),
    responses(
        (status = 200, description = "Insurance policy found", body = InsurancePolicy),
        (status = 404, description = "Insurance policy not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "insurance-policies"
)]
pub async fn get_insurance_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<InsurancePolicy>), ApiError> {
    crud::get_one(&state.insurance_policies, id).await
}

/// PUT /insurance-policies/{id} - Update some fields of an insurance policy
#[utoipa::path(
    put,
    path = routes::INSURANCE_POLICY_ITEM,
    params(("id" = String, Path, description = "Insurance policy id")),
    request_body = InsurancePolicyPatch,
    responses(
        (status = 200, description = "Insurance policy updated", body = InsurancePolicy),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Insurance policy not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "insurance-policies"
)]
pub async fn update_insurance_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<InsurancePolicyPatch>, JsonRejection>,
) -> Result<(StatusCode, Json<InsurancePolicy>), ApiError> {
    crud::update(&state.insurance_policies, id, payload).await
}

/// DELETE /insurance-policies/{id} - Delete an insurance policy
#[utoipa::path(
    delete,
    path = routes::INSURANCE_POLICY_ITEM,
    params(("id" = String, Path, description = "Insurance policy id")),
    responses(
        (status = 200, description = "Insurance policy deleted; body is the removed policy", body = InsurancePolicy),
        (status = 404, description = "Insurance policy not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "insurance-policies"
)]
pub async fn delete_insurance_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<InsurancePolicy>), ApiError> {
    crud::delete(&state.insurance_policies, id).await
}
