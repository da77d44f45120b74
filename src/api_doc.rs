use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{
    HealthRecord, HealthRecordDraft, HealthRecordPatch, InsurancePolicy, InsurancePolicyDraft,
    InsurancePolicyPatch,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "medshield-records API",
        version = "1.0.0",
        description = "Health records and insurance policies over a persistent ordered store"
    ),
    paths(
        handlers::health::health_handler,
        handlers::health_records::list_health_records,
        handlers::health_records::create_health_record,
        handlers::health_records::get_health_record,
        handlers::health_records::update_health_record,
        handlers::health_records::delete_health_record,
        handlers::insurance_policies::list_insurance_policies,
        handlers::insurance_policies::create_insurance_policy,
        handlers::insurance_policies::get_insurance_policy,
        handlers::insurance_policies::update_insurance_policy,
        handlers::insurance_policies::delete_insurance_policy
    ),
    components(
        schemas(
            HealthRecord,
            HealthRecordDraft,
            HealthRecordPatch,
            InsurancePolicy,
            InsurancePolicyDraft,
            InsurancePolicyPatch,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "health-records", description = "Patient health record operations"),
        (name = "insurance-policies", description = "Insurance policy operations")
    )
)]
pub struct ApiDoc;
