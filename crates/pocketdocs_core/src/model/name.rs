//! Display-name normalization and validation.
//!
//! # Responsibility
//! - Trim user-provided names before persistence.
//! - Expose the length rules request schemas apply to folder and profile
//!   names.
//!
//! # Invariants
//! - Stored names are never blank.
//! - Length is measured in Unicode scalar values, not bytes.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum length of folder and profile names.
pub const DISPLAY_NAME_MIN_CHARS: usize = 3;
/// Maximum length of folder and profile names.
pub const DISPLAY_NAME_MAX_CHARS: usize = 24;

/// Name rejected by normalization or validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    /// Name is empty after trim.
    Blank,
    /// Name is shorter than the minimum length.
    TooShort { min: usize, actual: usize },
    /// Name is longer than the maximum length.
    TooLong { max: usize, actual: usize },
}

impl Display for NameValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "name must not be blank"),
            Self::TooShort { min, actual } => {
                write!(f, "name must have at least {min} characters, got {actual}")
            }
            Self::TooLong { max, actual } => {
                write!(f, "name must have at most {max} characters, got {actual}")
            }
        }
    }
}

impl Error for NameValidationError {}

/// Trims `value` and rejects blank names.
pub fn normalize_name(value: &str) -> Result<String, NameValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NameValidationError::Blank);
    }
    Ok(trimmed.to_string())
}

/// Normalizes `value` and enforces the display-name length bounds.
pub fn validate_display_name(value: &str) -> Result<String, NameValidationError> {
    let normalized = normalize_name(value)?;
    let actual = normalized.chars().count();
    if actual < DISPLAY_NAME_MIN_CHARS {
        return Err(NameValidationError::TooShort {
            min: DISPLAY_NAME_MIN_CHARS,
            actual,
        });
    }
    if actual > DISPLAY_NAME_MAX_CHARS {
        return Err(NameValidationError::TooLong {
            max: DISPLAY_NAME_MAX_CHARS,
            actual,
        });
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, validate_display_name, NameValidationError};

    #[test]
    fn normalize_trims_and_rejects_blank() {
        assert_eq!(normalize_name("  Work ").unwrap(), "Work");
        assert_eq!(normalize_name(" \t").unwrap_err(), NameValidationError::Blank);
    }

    #[test]
    fn validate_enforces_bounds_in_chars() {
        assert!(matches!(
            validate_display_name("ab"),
            Err(NameValidationError::TooShort { min: 3, actual: 2 })
        ));
        assert!(matches!(
            validate_display_name(&"x".repeat(25)),
            Err(NameValidationError::TooLong { max: 24, actual: 25 })
        ));
        assert_eq!(validate_display_name("ééé").unwrap(), "ééé");
    }
}
