pub mod crud;
pub mod health;
pub mod health_records;
pub mod insurance_policies;

