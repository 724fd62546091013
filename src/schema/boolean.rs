//! Boolean schema
//!
//! Accepts native booleans, the integers 1/0 and the usual textual spellings.
//! Carries no rules beyond the base coercion.

use serde_json::Value;

use super::base::SchemaBase;
use crate::errors::{ConfigError, ConfigResult, ErrorKind, ValidationError};

/// Boolean validator
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    base: SchemaBase<()>,
}

impl BooleanSchema {
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
    /// `InvalidDefault` unless the default is a boolean or `null`.
    pub fn optional_with(mut self, default: impl Into<Value>) -> ConfigResult<Self> {
        let default = default.into();
        if !matches!(default, Value::Bool(_) | Value::Null) {
            return Err(ConfigError::InvalidDefault { expected: "boolean" });
        }
        self.base.set_optional(default);
        Ok(self)
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

    /// Coerces the input to a boolean.
    pub fn process(&self, input: Value) -> Result<Value, ValidationError> {
        if let Some(default) = self.base.short_circuit(&input) {
            return Ok(default);
        }
        coerce(&input)
            .map(Value::Bool)
            .ok_or_else(|| ValidationError::new(ErrorKind::BoolInvalid))
    }
}

fn coerce(input: &Value) -> Option<bool> {
    match input {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
