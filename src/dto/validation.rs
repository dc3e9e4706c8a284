//! Validation helpers for DTOs.

use validator::ValidationError;

/// Language roles a seat can be assigned.
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["html", "css", "js"];

/// Validates that a language role is one of the supported editor languages.
///
/// # Examples
///
/// ```ignore
/// validate_language("css")  // Ok
/// validate_language("CSS")  // Err - uppercase
/// validate_language("rust") // Err - unsupported
/// ```
pub fn validate_language(language: &str) -> Result<(), ValidationError> {
    if !SUPPORTED_LANGUAGES.contains(&language) {
        let mut err = ValidationError::new("language");
        err.message = Some(
            format!(
                "language must be one of {:?} (got {language:?})",
                SUPPORTED_LANGUAGES
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language_valid() {
        assert!(validate_language("html").is_ok());
        assert!(validate_language("css").is_ok());
        assert!(validate_language("js").is_ok());
    }

    #[test]
    fn test_validate_language_invalid() {
        assert!(validate_language("CSS").is_err()); // uppercase
        assert!(validate_language("javascript").is_err()); // full name
        assert!(validate_language("rust").is_err()); // unsupported
        assert!(validate_language("").is_err()); // empty
    }
}
