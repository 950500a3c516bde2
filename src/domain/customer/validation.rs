//! Customer validation utilities

use thiserror::Error;

/// Errors that can occur during customer validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CustomerValidationError {
    #[error("Customer ID cannot be empty")]
    EmptyId,

    #[error("Customer ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("Customer ID contains invalid character: '{0}'. Only ASCII letters and digits are allowed")]
    InvalidIdCharacter(char),

    #[error("Company name cannot be empty")]
    EmptyCompanyName,

    #[error("Field '{field}' exceeds maximum length of {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
}

pub const MAX_CUSTOMER_ID_LENGTH: usize = 5;
pub const MAX_COMPANY_NAME_LENGTH: usize = 40;

/// Validate a customer ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 5 characters
/// - Only ASCII letters and digits
///
/// Case is not checked here; [`CustomerId`](super::CustomerId) normalizes it.
pub fn validate_customer_id(id: &str) -> Result<(), CustomerValidationError> {
    if id.is_empty() {
        return Err(CustomerValidationError::EmptyId);
    }

    if id.chars().count() > MAX_CUSTOMER_ID_LENGTH {
        return Err(CustomerValidationError::IdTooLong(MAX_CUSTOMER_ID_LENGTH));
    }

    if let Some(c) = id.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(CustomerValidationError::InvalidIdCharacter(c));
    }

    Ok(())
}

/// Validate a company name: required, non-blank, at most 40 characters
pub fn validate_company_name(name: &str) -> Result<(), CustomerValidationError> {
    if name.trim().is_empty() {
        return Err(CustomerValidationError::EmptyCompanyName);
    }

    validate_max_length("companyName", Some(name), MAX_COMPANY_NAME_LENGTH)
}

/// Validate the length of an optional text column
pub fn validate_max_length(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), CustomerValidationError> {
    match value {
        Some(v) if v.chars().count() > max => {
            Err(CustomerValidationError::FieldTooLong { field, max })
        }
        _ => Ok(()),
    }
}
