//! Error types for the sanitizer
//!
//! Two families:
//! - `ValidationError`: the input violated a rule. Expected for untrusted
//!   input, carries a stable code, params and a field path.
//! - `ConfigError`: a schema or engine was configured with contradictory or
//!   invalid parameters. Raised immediately by the configuring call.

mod kind;
mod messages;
mod path;
mod validation;

pub use kind::ErrorKind;
pub use messages::{default_template, interpolate, MessageCatalog, DEFAULT_FIELD_PREFIX};
pub use path::{PathSegment, ROOT};
pub use validation::{ValidationError, DEFAULT_WILDCARD, PATH_PARAM};

pub(crate) use path::parse_index;

use thiserror::Error;

/// Invalid schema or engine configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Trying to set non-{expected} default value for {expected} schema.")]
    InvalidDefault { expected: &'static str },

    #[error("Values for \"{rule}\" rule should not be an empty array.")]
    EmptyValueSet { rule: &'static str },

    #[error("Trying to define {schema} between validation with max < min ({min} > {max}).")]
    InvertedBounds {
        schema: &'static str,
        min: String,
        max: String,
    },

    #[error("Trying to define string trim rule with both left & right disabled.")]
    TrimDisabled,

    #[error("Trying to define ip rule with both v4 & v6 disabled.")]
    NoIpFamily,

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Date bound '{date}' does not match format '{format}'.")]
    InvalidDateBound { date: String, format: String },

    #[error("Schema alias with name {0} is already set.")]
    AliasExists(String),

    #[error("Undefined alias with name {0}.")]
    UndefinedAlias(String),

    #[error("Alias {name} is a {actual} schema, not {expected}.")]
    AliasKindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Schema nesting exceeded the maximum depth of {0}.")]
    RecursionLimit(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read '{path}': {reason}")]
    Io { path: String, reason: String },
}

/// Any failure raised by the processing engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SanitizeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SanitizeError {
    /// Returns the validation error, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            SanitizeError::Validation(e) => Some(e),
            SanitizeError::Config(_) => None,
        }
    }

    /// Returns the configuration error, if this is one
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            SanitizeError::Config(e) => Some(e),
            SanitizeError::Validation(_) => None,
        }
    }

    /// Returns the validation kind, if this is a validation error
    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_validation().map(ValidationError::kind)
    }

    /// Returns whether the input itself was rejected
    pub fn is_validation(&self) -> bool {
        matches!(self, SanitizeError::Validation(_))
    }
}

/// Result type for configuration calls
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for processing calls
pub type SanitizeResult<T> = Result<T, SanitizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::InvalidDefault { expected: "array" }.to_string(),
            "Trying to set non-array default value for array schema."
        );
        assert_eq!(
            ConfigError::EmptyValueSet { rule: "oneOf" }.to_string(),
            "Values for \"oneOf\" rule should not be an empty array."
        );
        assert_eq!(
            ConfigError::UndefinedAlias("missingSchema".into()).to_string(),
            "Undefined alias with name missingSchema."
        );
        assert_eq!(
            ConfigError::AliasExists("integer".into()).to_string(),
            "Schema alias with name integer is already set."
        );
    }

    #[test]
    fn test_sanitize_error_accessors() {
        let err: SanitizeError = ValidationError::new(ErrorKind::BoolInvalid).into();
        assert!(err.is_validation());
        assert_eq!(err.kind(), Some(ErrorKind::BoolInvalid));
        assert!(err.as_config().is_none());

        let err: SanitizeError = ConfigError::TrimDisabled.into();
        assert!(!err.is_validation());
        assert_eq!(err.kind(), None);
        assert_eq!(err.as_config(), Some(&ConfigError::TrimDisabled));
    }

    #[test]
    fn test_transparent_display() {
        let err: SanitizeError = ValidationError::new(ErrorKind::StrEmail).into();
        assert_eq!(err.to_string(), "Not a valid email.");
    }
}
