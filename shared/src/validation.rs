//! Input validation functions
//!
//! Custom validators used by the request types in [`crate::types`]
//! alongside the `validator` crate's derive macros.

use validator::ValidationError;

/// Validate a login/registration password.
///
/// Format checks only; strength is not enforced on existing accounts.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password_required"));
    }
    if password.len() > 128 {
        return Err(ValidationError::new("password_too_long"));
    }
    Ok(())
}

/// Validate a new password chosen on change-password.
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 6 {
        return Err(ValidationError::new("password_too_short"));
    }
    if password.len() > 128 {
        return Err(ValidationError::new("password_too_long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("secret1", true)]
    #[case("x", true)]
    fn test_validate_password(#[case] password: &str, #[case] ok: bool) {
        assert_eq!(validate_password(password).is_ok(), ok);
    }

    #[test]
    fn test_password_length_bound() {
        let long = "x".repeat(129);
        assert!(validate_password(&long).is_err());
    }

    #[rstest]
    #[case("12345", false)]
    #[case("123456", true)]
    fn test_new_password_minimum_length(#[case] password: &str, #[case] ok: bool) {
        assert_eq!(validate_new_password(password).is_ok(), ok);
    }
}
