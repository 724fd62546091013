//! Date schema
//!
//! Input must be a string that parses with the schema's format and formats
//! back to exactly the same text.

mod format;

use chrono::NaiveDateTime;
use serde_json::Value;

use super::base::SchemaBase;
use crate::errors::{ConfigError, ConfigResult, ErrorKind, ValidationError};
use format::DateFormat;

/// Rules attached to a date schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRule {
    /// Value must be strictly earlier than `bound`
    Before { bound: NaiveDateTime, date: String },
    /// Value must be strictly later than `bound`
    After { bound: NaiveDateTime, date: String },
}

/// Date validator
#[derive(Debug, Clone)]
pub struct DateSchema {
    format: DateFormat,
    base: SchemaBase<DateRule>,
}

impl DateSchema {
    pub fn new(format: &str) -> Self {
        Self {
            format: DateFormat::new(format),
            base: SchemaBase::new(),
        }
    }

    /// The format this schema parses with
    pub fn format(&self) -> &str {
        self.format.source()
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
    /// `InvalidDefault` unless the default is `null` or a string that parses
    /// strictly with this schema's format.
    pub fn optional_with(mut self, default: impl Into<Value>) -> ConfigResult<Self> {
        let default = default.into();
        let valid = match &default {
            Value::Null => true,
            Value::String(s) => self.format.parse_strict(s).is_some(),
            _ => false,
        };
        if !valid {
            return Err(ConfigError::InvalidDefault { expected: "date" });
        }
        self.base.set_optional(default);
        Ok(self)
    }

    /// # Errors
    ///
    /// `InvalidDateBound` when `date` does not parse with the schema's format.
    pub fn before(mut self, date: &str) -> ConfigResult<Self> {
        let bound = self.parse_bound(date)?;
        self.base.push(DateRule::Before {
            bound,
            date: date.to_string(),
        });
        Ok(self)
    }

    /// # Errors
    ///
    /// `InvalidDateBound` when `date` does not parse with the schema's format.
    pub fn after(mut self, date: &str) -> ConfigResult<Self> {
        let bound = self.parse_bound(date)?;
        self.base.push(DateRule::After {
            bound,
            date: date.to_string(),
        });
        Ok(self)
    }

    fn parse_bound(&self, date: &str) -> ConfigResult<NaiveDateTime> {
        self.format
            .parse_strict(date)
            .ok_or_else(|| ConfigError::InvalidDateBound {
                date: date.to_string(),
                format: self.format.source().to_string(),
            })
    }

    pub fn rules(&self) -> &[DateRule] {
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

    /// Validates the input against the format and the rules in order.
    pub fn process(&self, input: Value) -> Result<Value, ValidationError> {
        if let Some(default) = self.base.short_circuit(&input) {
            return Ok(default);
        }

        let Value::String(text) = input else {
            return Err(ValidationError::new(ErrorKind::DateInvalid));
        };
        let parsed = self
            .format
            .parse_strict(&text)
            .ok_or_else(|| ValidationError::new(ErrorKind::DateInvalid))?;

        for rule in self.base.rules() {
            match rule {
                DateRule::Before { bound, date } if parsed >= *bound => {
                    return Err(ValidationError::new(ErrorKind::DateBefore)
                        .with_param("date", date.as_str()));
                }
                DateRule::After { bound, date } if parsed <= *bound => {
                    return Err(ValidationError::new(ErrorKind::DateAfter)
                        .with_param("date", date.as_str()));
                }
                _ => {}
            }
        }

        Ok(Value::String(text))
    }
}
