use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::ApiError;
use crate::validation::{Validate, require_amount, require_date, require_text};

/// A record type stored in its own collection.
///
/// `Draft` is what a client sends to create a record and `Patch` is what it
/// sends to update one. Neither carries `id`, `createdAt` or `updatedAt`, so
/// those stay under server control.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Draft: DeserializeOwned + Validate + Send + 'static;
    type Patch: DeserializeOwned + Validate + Send + 'static;

    /// Human-readable name used in not-found messages
    const NOUN: &'static str;
    /// Storage name: Spanner table or JSON file stem
    const COLLECTION: &'static str;

    fn create(id: String, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    fn id(&self) -> &str;

    /// Overlay the fields present in `patch`
    fn merge(&mut self, patch: Self::Patch);

    fn touch(&mut self, updated_at: DateTime<Utc>);
}

/// A patient's health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: String,
    pub patient_name: String,
    pub date_of_birth: String,
    pub medical_history: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for creating a health record
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordDraft {
    pub patient_name: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub medical_history: String,
}

/// Request body for updating a health record; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordPatch {
    pub patient_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub medical_history: Option<String>,
}

impl Validate for HealthRecordDraft {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("patientName", &self.patient_name)?;
        require_date("dateOfBirth", &self.date_of_birth)?;
        require_text("medicalHistory", &self.medical_history)?;
        Ok(())
    }
}

impl Validate for HealthRecordPatch {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.patient_name {
            require_text("patientName", name)?;
        }
        if let Some(dob) = &self.date_of_birth {
            require_date("dateOfBirth", dob)?;
        }
        if let Some(history) = &self.medical_history {
            require_text("medicalHistory", history)?;
        }
        Ok(())
    }
}

impl Record for HealthRecord {
    type Draft = HealthRecordDraft;
    type Patch = HealthRecordPatch;

    const NOUN: &'static str = "Health record";
    const COLLECTION: &'static str = "health_records";

    fn create(id: String, created_at: DateTime<Utc>, draft: HealthRecordDraft) -> Self {
        HealthRecord {
            id,
            patient_name: draft.patient_name,
            date_of_birth: draft.date_of_birth,
            medical_history: draft.medical_history,
            created_at,
            updated_at: None,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn merge(&mut self, patch: HealthRecordPatch) {
        if let Some(name) = patch.patient_name {
            self.patient_name = name;
        }
        if let Some(dob) = patch.date_of_birth {
            self.date_of_birth = dob;
        }
        if let Some(history) = patch.medical_history {
            self.medical_history = history;
        }
    }

    fn touch(&mut self, updated_at: DateTime<Utc>) {
        self.updated_at = Some(updated_at);
    }
}

/// An insurance policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePolicy {
    pub id: String,
    /// Name of the policyholder
    pub policy_holder: String,
    pub coverage_details: String,
    /// Monthly or yearly premium
    pub premium_amount: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for creating an insurance policy
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePolicyDraft {
    pub policy_holder: String,
    pub coverage_details: String,
    pub premium_amount: f64,
}

/// Request body for updating an insurance policy; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePolicyPatch {
    pub policy_holder: Option<String>,
    pub coverage_details: Option<String>,
    pub premium_amount: Option<f64>,
}

impl Validate for InsurancePolicyDraft {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("policyHolder", &self.policy_holder)?;
        require_text("coverageDetails", &self.coverage_details)?;
        require_amount("premiumAmount", self.premium_amount)?;
        Ok(())
    }
}

impl Validate for InsurancePolicyPatch {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(holder) = &self.policy_holder {
            require_text("policyHolder", holder)?;
        }
        if let Some(coverage) = &self.coverage_details {
            require_text("coverageDetails", coverage)?;
        }
        if let Some(premium) = self.premium_amount {
            require_amount("premiumAmount", premium)?;
        }
        Ok(())
    }
}

impl Record for InsurancePolicy {
    type Draft = InsurancePolicyDraft;
    type Patch = InsurancePolicyPatch;

    const NOUN: &'static str = "Insurance policy";
    const COLLECTION: &'static str = "insurance_policies";

    fn create(id: String, created_at: DateTime<Utc>, draft: InsurancePolicyDraft) -> Self {
        InsurancePolicy {
            id,
            policy_holder: draft.policy_holder,
            coverage_details: draft.coverage_details,
            premium_amount: draft.premium_amount,
            created_at,
            updated_at: None,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn merge(&mut self, patch: InsurancePolicyPatch) {
        if let Some(holder) = patch.policy_holder {
            self.policy_holder = holder;
        }
        if let Some(coverage) = patch.coverage_details {
            self.coverage_details = coverage;
        }
        if let Some(premium) = patch.premium_amount {
            self.premium_amount = premium;
        }
    }

    fn touch(&mut self, updated_at: DateTime<Utc>) {
        self.updated_at = Some(updated_at);
    }
}
