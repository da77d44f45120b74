use chrono::NaiveDate;

use crate::error::ApiError;

/// Checked before a request payload touches the store.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

pub fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Calendar date in `YYYY-MM-DD` form
pub fn require_date(field: &str, value: &str) -> Result<(), ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::invalid(format!(
            "{} must be a date in YYYY-MM-DD format, got '{}'",
            field, value
        ))
    })?;
    Ok(())
}

pub fn require_amount(field: &str, value: f64) -> Result<(), ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::invalid(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("patientName", "Alice").is_ok());
        assert!(require_text("patientName", "").is_err());
        assert!(require_text("patientName", "   ").is_err());
    }

    #[test]
    fn test_require_date() {
        assert!(require_date("dateOfBirth", "1990-01-01").is_ok());
        assert!(require_date("dateOfBirth", "1990-02-30").is_err());
        assert!(require_date("dateOfBirth", "01/01/1990").is_err());

        match require_date("dateOfBirth", "yesterday") {
            Err(ApiError::InvalidInput(msg)) => {
                assert!(msg.contains("dateOfBirth"));
                assert!(msg.contains("yesterday"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_require_amount() {
        assert!(require_amount("premiumAmount", 0.0).is_ok());
        assert!(require_amount("premiumAmount", 120.5).is_ok());
        assert!(require_amount("premiumAmount", -1.0).is_err());
        assert!(require_amount("premiumAmount", f64::NAN).is_err());
        assert!(require_amount("premiumAmount", f64::INFINITY).is_err());
    }
}
