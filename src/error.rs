//! Validation error surface for the settings-save flow
//!
//! A rejected save reports the field, a machine code and a human-readable
//! message. The stored value of the field is left untouched.

use serde::{Deserialize, Serialize};

/// Machine-readable validation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    /// Override configuration is not a JSON object
    InvalidJson,
}

impl ValidationCode {
    /// Returns the string representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::InvalidJson => "invalid_json",
        }
    }
}

impl std::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Save-time validation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("TSML UI configuration must be valid JSON: {0}")]
    InvalidJson(String),
}

impl ValidationError {
    /// Returns the validation code for this error
    pub fn code(&self) -> ValidationCode {
        match self {
            ValidationError::InvalidJson(_) => ValidationCode::InvalidJson,
        }
    }

    /// Persisted setting key the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidJson(_) => "tsml_config",
        }
    }

    /// Structured form handed back to the settings-save flow
    pub fn to_failure(&self) -> ValidationFailure {
        ValidationFailure {
            field: self.field().to_string(),
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Serializable validation failure (`field`, `code`, `message`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_surface() {
        let err = ValidationError::InvalidJson("trailing comma at line 1 column 8".to_string());
        assert_eq!(err.code(), ValidationCode::InvalidJson);
        assert_eq!(err.field(), "tsml_config");
        assert!(err.to_string().contains("trailing comma"));
    }

    #[test]
    fn test_failure_serializes_code() {
        let failure = ValidationError::InvalidJson("x".to_string()).to_failure();
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["field"], "tsml_config");
        assert_eq!(json["code"], "invalid_json");
        assert!(json["message"].as_str().unwrap().contains("valid JSON"));
    }
}
