use ums_db::schema::MAX_TEXT_LEN;
use validator::ValidateEmail;

use crate::error::ApiError;

/// Validate an email before it reaches the repository.
///
/// The value is checked as-is: emails are case-sensitive and never normalized.
///
/// # Examples
/// ```
/// use ums_api::validation::validate_email;
///
/// assert!(validate_email("alice@example.com").is_ok());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::Validation("Email cannot be empty".to_string()));
    }

    // PostgreSQL text columns cannot store NUL
    if email.contains('\0') {
        return Err(ApiError::Validation(
            "Email cannot contain NUL characters".to_string(),
        ));
    }

    if email.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::Validation(format!(
            "Email must be at most {MAX_TEXT_LEN} characters long"
        )));
    }

    if !email.validate_email() {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Name cannot be empty".to_string()));
    }

    // PostgreSQL text columns cannot store NUL
    if name.contains('\0') {
        return Err(ApiError::Validation(
            "Name cannot contain NUL characters".to_string(),
        ));
    }

    if name.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::Validation(format!(
            "Name must be at most {MAX_TEXT_LEN} characters long"
        )));
    }

    Ok(())
}

/// Validate a user id taken from the path
pub fn validate_user_id(id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::Validation("Invalid user ID".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("User.Name+tag@Example.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email(&format!("{}@example.com", "a".repeat(250))).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Alice").is_ok());
        assert!(validate_name("Zoë d'Arc").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("\t\n").is_err());
        assert!(validate_name(&"x".repeat(MAX_TEXT_LEN + 1)).is_err());
    }

    #[test]
    fn test_rejects_nul_characters() {
        let err = validate_name("A\u{0}B").unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref msg) if msg.contains("NUL")));

        assert!(validate_name("\0").is_err());
        assert!(validate_email("user\u{0}@example.com").is_err());
    }

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id(1).is_ok());
        assert!(validate_user_id(0).is_err());
        assert!(validate_user_id(-7).is_err());
    }
}
