//! Integer schema

use serde_json::Value;

use super::base::SchemaBase;
use crate::errors::{ConfigError, ConfigResult, ErrorKind, ValidationError};

/// Rules attached to an integer schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegerRule {
    Min(i64),
    Max(i64),
    Equals(i64),
    Not(i64),
    OneOf(Vec<i64>),
    NotOneOf(Vec<i64>),
}

/// Integer validator
#[derive(Debug, Clone, Default)]
pub struct IntegerSchema {
    base: SchemaBase<IntegerRule>,
}

impl IntegerSchema {
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
    /// `InvalidDefault` unless the default is an integer or `null`.
    pub fn optional_with(mut self, default: impl Into<Value>) -> ConfigResult<Self> {
        let default = default.into();
        let valid = match &default {
            Value::Null => true,
            Value::Number(n) => n.is_i64(),
            _ => false,
        };
        if !valid {
            return Err(ConfigError::InvalidDefault { expected: "integer" });
        }
        self.base.set_optional(default);
        Ok(self)
    }

    pub fn min(mut self, min: i64) -> Self {
        self.base.push(IntegerRule::Min(min));
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.base.push(IntegerRule::Max(max));
        self
    }

    /// Appends a `min` and a `max` rule.
    ///
    /// # Errors
    ///
    /// `InvertedBounds` when `max < min`.
    pub fn between(self, min: i64, max: i64) -> ConfigResult<Self> {
        if max < min {
            return Err(ConfigError::InvertedBounds {
                schema: "integer",
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(self.min(min).max(max))
    }

    pub fn equals(mut self, expected: i64) -> Self {
        self.base.push(IntegerRule::Equals(expected));
        self
    }

    pub fn not(mut self, unexpected: i64) -> Self {
        self.base.push(IntegerRule::Not(unexpected));
        self
    }

    /// # Errors
    ///
    /// `EmptyValueSet` when `values` is empty.
    pub fn one_of(mut self, values: impl Into<Vec<i64>>) -> ConfigResult<Self> {
        let values = values.into();
        if values.is_empty() {
            return Err(ConfigError::EmptyValueSet { rule: "oneOf" });
        }
        self.base.push(IntegerRule::OneOf(values));
        Ok(self)
    }

    /// # Errors
    ///
    /// `EmptyValueSet` when `values` is empty.
    pub fn not_one_of(mut self, values: impl Into<Vec<i64>>) -> ConfigResult<Self> {
        let values = values.into();
        if values.is_empty() {
            return Err(ConfigError::EmptyValueSet { rule: "notOneOf" });
        }
        self.base.push(IntegerRule::NotOneOf(values));
        Ok(self)
    }

    pub fn rules(&self) -> &[IntegerRule] {
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

    /// Coerces the input to an integer and applies the rules in order.
    pub fn process(&self, input: Value) -> Result<Value, ValidationError> {
        if let Some(default) = self.base.short_circuit(&input) {
            return Ok(default);
        }
        let value = coerce(&input).ok_or_else(|| ValidationError::new(ErrorKind::IntInvalid))?;

        for rule in self.base.rules() {
            check(rule, value)?;
        }

        Ok(Value::from(value))
    }
}

fn check(rule: &IntegerRule, value: i64) -> Result<(), ValidationError> {
    match rule {
        IntegerRule::Min(min) if value < *min => {
            Err(ValidationError::new(ErrorKind::IntMin).with_param("min", *min))
        }
        IntegerRule::Max(max) if value > *max => {
            Err(ValidationError::new(ErrorKind::IntMax).with_param("max", *max))
        }
        IntegerRule::Equals(expected) if value != *expected => {
            Err(ValidationError::new(ErrorKind::IntEquals).with_param("expected", *expected))
        }
        IntegerRule::Not(unexpected) if value == *unexpected => Err(
            ValidationError::new(ErrorKind::IntNotEquals).with_param("unexpected", *unexpected),
        ),
        IntegerRule::OneOf(values) if !values.contains(&value) => {
            Err(ValidationError::new(ErrorKind::IntOneOf).with_param("values", values.clone()))
        }
        IntegerRule::NotOneOf(values) if values.contains(&value) => {
            Err(ValidationError::new(ErrorKind::IntNotOneOf).with_param("values", values.clone()))
        }
        _ => Ok(()),
    }
}

fn coerce(input: &Value) -> Option<i64> {
    match input {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            let f = n.as_f64()?;
            // i64::MAX as f64 rounds up to 2^63, which is out of range
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(f as i64)
            } else {
                None
            }
        }
        Value::String(s) => parse_integer_text(s),
        _ => None,
    }
}

/// Optional ASCII whitespace, optional sign, digits without leading zeros.
fn parse_integer_text(raw: &str) -> Option<i64> {
    let s = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    s.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_inputs() {
        let schema = IntegerSchema::new();
        let cases = [
            (json!(-1), -1),
            (json!(0), 0),
            (json!(999), 999),
            (json!(i64::MAX), i64::MAX),
            (json!("1"), 1),
            (json!("-1"), -1),
            (json!(" 42 "), 42),
            (json!(3.0), 3),
        ];
        for (input, expected) in cases {
            assert_eq!(schema.process(input).unwrap(), json!(expected));
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let schema = IntegerSchema::new();
        for input in [
            json!(true),
            json!(false),
            json!("invalid"),
            json!(3.14),
            json!("3.0"),
            json!("007"),
            json!([]),
            json!({"key": "value"}),
            json!(null),
        ] {
            assert_eq!(schema.process(input).unwrap_err().kind(), ErrorKind::IntInvalid);
        }
    }

    #[test]
    fn test_min_max() {
        assert!(IntegerSchema::new().min(1).process(json!(1)).is_ok());
        let err = IntegerSchema::new().min(1).process(json!(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IntMin);
        assert_eq!(err.param("min"), Some(&json!(1)));

        let err = IntegerSchema::new().max(1).process(json!(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IntMax);
        assert!(err.message().contains('1'));
    }

    #[test]
    fn test_between() {
        let schema = IntegerSchema::new().between(1, 100).unwrap();
        assert_eq!(schema.rules(), &[IntegerRule::Min(1), IntegerRule::Max(100)]);
        assert_eq!(schema.process(json!(-1)).unwrap_err().kind(), ErrorKind::IntMin);
        assert!(IntegerSchema::new().between(-100, 100).unwrap().process(json!(-1)).is_ok());

        let err = IntegerSchema::new().between(5, 1).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBounds { .. }));
    }

    #[test]
    fn test_equals_and_not() {
        let err = IntegerSchema::new().equals(101).process(json!(100)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IntEquals);
        assert!(err.message().contains("101"));

        assert!(IntegerSchema::new().not(0).process(json!(1)).is_ok());
        let err = IntegerSchema::new().not(1).process(json!(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IntNotEquals);
    }

    #[test]
    fn test_one_of() {
        let schema = IntegerSchema::new().one_of([0, 1]).unwrap();
        assert!(schema.process(json!(1)).is_ok());
        let err = schema.process(json!(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IntOneOf);
        assert!(err.message().contains("0|1"));

        let err = IntegerSchema::new().one_of(Vec::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Values for \"oneOf\" rule should not be an empty array."
        );
    }

    #[test]
    fn test_not_one_of() {
        let schema = IntegerSchema::new().not_one_of([0, 1]).unwrap();
        assert!(schema.process(json!(2)).is_ok());
        let err = schema.process(json!(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IntNotOneOf);
        assert!(err.message().contains("0|1"));

        assert_eq!(
            IntegerSchema::new().not_one_of(Vec::new()).unwrap_err(),
            ConfigError::EmptyValueSet { rule: "notOneOf" }
        );
    }

    #[test]
    fn test_optional() {
        let schema = IntegerSchema::new().min(10).optional_with(1).unwrap();
        assert_eq!(schema.process(Value::Null).unwrap(), json!(1));
        assert!(IntegerSchema::new().optional_with(1.5).is_err());
        assert!(IntegerSchema::new().optional_with("1").is_err());
    }
}
