//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Payload shape (lengths, email format, ranges) is declared with
//! `validator` derives on the shared models; this module turns those
//! reports into `AppError`s and adds the checks derives cannot express.

use crate::utils::{AppError, ErrorCode};
use validator::{Validate, ValidationErrors};

// ── Text length limits ──────────────────────────────────────────────

/// Department names
pub const MAX_DEPARTMENT_NAME_LEN: usize = 100;

/// Dish names
pub const MAX_DISH_NAME_LEN: usize = 200;

/// Order remarks
pub const MAX_REMARKS_LEN: usize = 1000;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Run the payload's derived validation and convert failures into a
/// `ValidationFailed` error listing the offending fields.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .iter()
        .map(|(field, list)| {
            let reasons = list.iter().map(|e| e.code.to_string()).collect();
            (field.to_string(), reasons)
        })
        .collect();
    fields.sort();

    let names: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
    let mut err = AppError::validation(format!("Invalid fields: {}", names.join(", ")));
    for (field, reasons) in fields {
        err = err.with_detail(field, reasons);
    }
    err
}

/// Validate that a required string is not just whitespace.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is not just whitespace.
pub fn validate_optional_required_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required_text(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate a password against the configured minimum length.
pub fn validate_password(password: &str, min_len: usize) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < min_len {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {min_len} characters"),
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long ({len} chars, max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DepartmentCreate, UserCreate};

    fn user(email: &str) -> UserCreate {
        UserCreate {
            name: "Test User".into(),
            email: email.into(),
            password: "password123".into(),
            phone: "123-456-7890".into(),
            department_id: None,
        }
    }

    #[test]
    fn test_validate_payload_accepts_valid_user() {
        assert!(validate_payload(&user("test@example.com")).is_ok());
    }

    #[test]
    fn test_validate_payload_rejects_bad_email() {
        let err = validate_payload(&user("not-an-email")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.details.unwrap().contains_key("email"));
    }

    #[test]
    fn test_validate_payload_lists_all_fields() {
        let payload = UserCreate {
            name: String::new(),
            phone: String::new(),
            ..user("bad")
        };
        let err = validate_payload(&payload).unwrap_err();
        assert_eq!(err.message, "Invalid fields: email, name, phone");
    }

    #[test]
    fn test_validate_department_name_length() {
        let payload = DepartmentCreate {
            name: "x".repeat(MAX_DEPARTMENT_NAME_LEN + 1),
            description: None,
        };
        assert!(validate_payload(&payload).is_err());
    }

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("Pizza", "name", 10).is_ok());
        assert_eq!(
            validate_required_text("   ", "name", 10).unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            validate_required_text("Margherita Pizza", "name", 10)
                .unwrap_err()
                .code,
            ErrorCode::ValidationFailed
        );
        assert!(validate_optional_required_text(&None, "name", 10).is_ok());
        assert!(validate_optional_required_text(&Some(" ".into()), "name", 10).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123", 8).is_ok());
        assert_eq!(
            validate_password("short", 8).unwrap_err().code,
            ErrorCode::PasswordTooShort
        );
        assert!(validate_password(&"p".repeat(MAX_PASSWORD_LEN + 1), 8).is_err());
    }
}
