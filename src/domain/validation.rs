//! Shared validation for codes and names

use thiserror::Error;

use super::DomainError;

/// Errors that can occur while validating codes and names
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodeValidationError {
    #[error("code is required")]
    EmptyCode,

    #[error("code exceeds maximum length of {0} characters")]
    CodeTooLong(usize),

    #[error("code contains invalid character: '{0}'. Only letters, digits, '-', '_' and '.' are allowed")]
    InvalidCharacter(char),

    #[error("name is required")]
    EmptyName,

    #[error("name exceeds maximum length of {0} characters")]
    NameTooLong(usize),
}

impl From<CodeValidationError> for DomainError {
    fn from(err: CodeValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

const MAX_CODE_LENGTH: usize = 64;
const MAX_NAME_LENGTH: usize = 255;

/// Trim and lowercase a code. Applied before every comparison and before storage.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Normalize a code and validate the result
///
/// Rules:
/// - Cannot be empty after trimming
/// - Maximum 64 characters
/// - Only ASCII alphanumerics, '-', '_' and '.'
pub fn validate_code(code: &str) -> Result<String, CodeValidationError> {
    let normalized = normalize_code(code);

    if normalized.is_empty() {
        return Err(CodeValidationError::EmptyCode);
    }

    if normalized.len() > MAX_CODE_LENGTH {
        return Err(CodeValidationError::CodeTooLong(MAX_CODE_LENGTH));
    }

    if let Some(c) = normalized
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(CodeValidationError::InvalidCharacter(c));
    }

    Ok(normalized)
}

/// Validate a display name, returning it trimmed
pub fn validate_name(name: &str) -> Result<String, CodeValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(CodeValidationError::EmptyName);
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CodeValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(trimmed.to_string())
}

/// Empty descriptions are stored as absent
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
