//! Engine configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};
use crate::observability::Severity;

/// Default cap on document nesting and on alias reference chains
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Sanitizer engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Maximum document nesting, and maximum chain of alias references
    /// followed without entering a nested value (default: 64)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Lowest severity written to the log (default: WARN)
    #[serde(default)]
    pub log_level: Severity,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            log_level: Severity::default(),
        }
    }
}

impl SanitizerConfig {
    /// Create a config with the given depth cap
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Parse and validate configuration from JSON
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: SanitizerConfig = serde_json::from_str(raw)
            .map_err(|e| ConfigError::InvalidConfig(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidConfig("max_depth must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = SanitizerConfig::default();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.log_level, Severity::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SanitizerConfig::from_json_str(r#"{"log_level": "TRACE"}"#).unwrap();
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.log_level, Severity::Trace);

        let config = SanitizerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SanitizerConfig::default());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = SanitizerConfig::from_json_str(r#"{"max_depth": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
        assert!(SanitizerConfig::with_max_depth(0).validate().is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(SanitizerConfig::from_json_str("{").is_err());
        assert!(SanitizerConfig::from_json_str(r#"{"log_level": "LOUD"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_depth": 8, "log_level": "INFO"}}"#).unwrap();

        let config = SanitizerConfig::load(file.path()).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.log_level, Severity::Info);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SanitizerConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
