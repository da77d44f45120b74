// Route path constants - single source of truth for all API paths

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{health, health_records, insurance_policies};
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const HEALTH_RECORDS: &str = "/health-records";
pub const HEALTH_RECORD_ITEM: &str = "/health-records/{id}";
pub const INSURANCE_POLICIES: &str = "/insurance-policies";
pub const INSURANCE_POLICY_ITEM: &str = "/insurance-policies/{id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(health::health_handler))
        .route(
            HEALTH_RECORDS,
            get(health_records::list_health_records).post(health_records::create_health_record),
        )
        .route(
            HEALTH_RECORD_ITEM,
            get(health_records::get_health_record)
                .put(health_records::update_health_record)
                .delete(health_records::delete_health_record),
        )
        .route(
            INSURANCE_POLICIES,
            get(insurance_policies::list_insurance_policies)
                .post(insurance_policies::create_insurance_policy),
        )
        .route(
            INSURANCE_POLICY_ITEM,
            get(insurance_policies::get_insurance_policy)
                .put(insurance_policies::update_insurance_policy)
                .delete(insurance_policies::delete_insurance_policy),
        )
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
