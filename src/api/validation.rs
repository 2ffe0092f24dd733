//! Presence checks for API request bodies.
//!
//! Fields are only checked for being present and non-blank; format and length
//! rules are not enforced.

use super::error::{ApiError, ValidationErrorBuilder};
use crate::db::{CredentialsRequest, CreateProductRequest};

/// Validate that a required text field is not blank
pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    Ok(())
}

pub fn validate_credentials(req: &CredentialsRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_required(&req.username, "Username") {
        errors.add("username", e);
    }
    if let Err(e) = validate_required(&req.password, "Password") {
        errors.add("password", e);
    }

    errors.finish()
}

pub fn validate_create_product(req: &CreateProductRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_required(&req.title, "Title") {
        errors.add("title", e);
    }

    errors.finish()
}
