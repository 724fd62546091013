//! Decimal schema
//!
//! The working value is a plain decimal string. Bounds compare numerically.

use std::sync::OnceLock;

use serde_json::Value;

use super::base::SchemaBase;
use super::loose::{json_number, number_to_string, numeric_value};
use super::string::StringSchema;
use crate::errors::{ConfigError, ConfigResult, ErrorKind, ValidationError};

/// Rules attached to a decimal schema
#[derive(Debug, Clone, PartialEq)]
pub enum DecimalRule {
    Min(f64),
    Max(f64),
}

/// Decimal validator
#[derive(Debug, Clone, Default)]
pub struct DecimalSchema {
    base: SchemaBase<DecimalRule>,
}

/// Canonicalizing pipeline shared by every decimal schema
fn canonical_pipeline() -> &'static StringSchema {
    static PIPELINE: OnceLock<StringSchema> = OnceLock::new();
    PIPELINE.get_or_init(|| {
        StringSchema::new()
            .trim()
            .regex("[0-9.]+", None)
            .expect("decimal pipeline pattern is valid")
    })
}

impl DecimalSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the schema optional with a `null` default
    pub fn optional(mut self) -> Self {
        self.base.set_optional(Value::Null);
        self
    }

    /// Marks the schema optional with the given default.
    ///
    /// # Errors
    ///
    /// `InvalidDefault` unless the default is a number, a numeric string or `null`.
    pub fn optional_with(mut self, default: impl Into<Value>) -> ConfigResult<Self> {
        let default = default.into();
        let valid = match &default {
            Value::Null | Value::Number(_) => true,
            Value::String(s) => numeric_value(s).is_some(),
            _ => false,
        };
        if !valid {
            return Err(ConfigError::InvalidDefault { expected: "decimal" });
        }
        self.base.set_optional(default);
        Ok(self)
    }

    pub fn min(mut self, min: f64) -> Self {
        self.base.push(DecimalRule::Min(min));
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.base.push(DecimalRule::Max(max));
        self
    }

    pub fn rules(&self) -> &[DecimalRule] {
        self.base.rules()
    }

    pub fn is_optional(&self) -> bool {
        self.base.is_optional()
    }

    pub fn default_value(&self) -> &Value {
        self.base.default_value()
    }

    pub fn is_aliased(&self) -> bool {
        self.base.is_aliased()
    }

    pub(crate) fn mark_aliased(&mut self) {
        self.base.mark_aliased();
    }

    /// Normalizes the input to a decimal string and applies the rules in order.
    pub fn process(&self, input: Value) -> Result<Value, ValidationError> {
        if let Some(default) = self.base.short_circuit(&input) {
            return Ok(default);
        }

        let text = match &input {
            Value::Number(n) => number_to_string(n),
            Value::String(s) if numeric_value(s).is_some() => s.clone(),
            _ => return Err(ValidationError::new(ErrorKind::DecInvalid)),
        };

        // Inner failures never leak; they all collapse into DecInvalid.
        let canonical = match canonical_pipeline().process(Value::String(text)) {
            Ok(Value::String(s)) => s,
            _ => return Err(ValidationError::new(ErrorKind::DecInvalid)),
        };
        let magnitude =
            numeric_value(&canonical).ok_or_else(|| ValidationError::new(ErrorKind::DecInvalid))?;

        for rule in self.base.rules() {
            match rule {
                DecimalRule::Min(min) if magnitude < *min => {
                    return Err(
                        ValidationError::new(ErrorKind::DecMin).with_param("min", json_number(*min))
                    );
                }
                DecimalRule::Max(max) if magnitude > *max => {
                    return Err(
                        ValidationError::new(ErrorKind::DecMax).with_param("max", json_number(*max))
                    );
                }
                _ => {}
            }
        }

        Ok(Value::String(canonical))
    }
}
