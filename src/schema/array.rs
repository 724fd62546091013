//! Array schema
//!
//! Works on sequential (`Value::Array`) and associative (`Value::Object`)
//! structures. The `schema` and `each` rules recurse through the engine
//! context so nested failures pick up one path segment per level.

use serde_json::{Map, Value};

use super::base::SchemaBase;
use super::loose::find_loose_duplicate;
use super::Schema;
use crate::engine::Context;
use crate::errors::{
    parse_index, ConfigError, ConfigResult, ErrorKind, PathSegment, SanitizeResult,
    ValidationError,
};

/// Rules attached to an array schema
#[derive(Debug, Clone)]
pub enum ArrayRule {
    /// Per-key sub-schemas, in declaration order
    Schema(Vec<(String, Schema)>),
    /// Keys must be the dense range `0..n`
    Scalar,
    /// No two elements may be loosely equal
    Unique,
    /// Sub-schema applied to every element
    Each(Box<Schema>),
    Min(usize),
    Max(usize),
}

/// Array validator
#[derive(Debug, Clone, Default)]
pub struct ArraySchema {
    base: SchemaBase<ArrayRule>,
}

impl ArraySchema {
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
    /// `InvalidDefault` unless the default is an array, an object or `null`.
    pub fn optional_with(mut self, default: impl Into<Value>) -> ConfigResult<Self> {
        let default = default.into();
        if !matches!(default, Value::Array(_) | Value::Object(_) | Value::Null) {
            return Err(ConfigError::InvalidDefault { expected: "array" });
        }
        self.base.set_optional(default);
        Ok(self)
    }

    /// Processes the declared keys with their sub-schemas. Undeclared keys
    /// pass through untouched.
    pub fn schema<I, K, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Schema>,
    {
        let fields = fields
            .into_iter()
            .map(|(key, schema)| (key.into(), schema.into()))
            .collect();
        self.base.push(ArrayRule::Schema(fields));
        self
    }

    pub fn scalar(mut self) -> Self {
        self.base.push(ArrayRule::Scalar);
        self
    }

    pub fn unique(mut self) -> Self {
        self.base.push(ArrayRule::Unique);
        self
    }

    pub fn each(mut self, schema: impl Into<Schema>) -> Self {
        self.base.push(ArrayRule::Each(Box::new(schema.into())));
        self
    }

    pub fn min(mut self, count: usize) -> Self {
        self.base.push(ArrayRule::Min(count));
        self
    }

    pub fn max(mut self, count: usize) -> Self {
        self.base.push(ArrayRule::Max(count));
        self
    }

    pub fn rules(&self) -> &[ArrayRule] {
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

    pub(crate) fn process(&self, input: Value, ctx: &Context<'_>) -> SanitizeResult<Value> {
        if let Some(default) = self.base.short_circuit_if(is_absent(&input)) {
            return Ok(default);
        }
        if !matches!(input, Value::Array(_) | Value::Object(_)) {
            return Err(ValidationError::new(ErrorKind::ArrInvalid).into());
        }

        let mut value = input;
        for rule in self.base.rules() {
            value = apply(rule, value, ctx)?;
        }

        Ok(value)
    }
}

fn is_absent(input: &Value) -> bool {
    match input {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn apply(rule: &ArrayRule, value: Value, ctx: &Context<'_>) -> SanitizeResult<Value> {
    match rule {
        ArrayRule::Schema(fields) => {
            let mut value = value;
            for (key, schema) in fields {
                let current = read_key(&value, key);
                let processed = ctx.descend(current, schema, PathSegment::from_key(key))?;
                value = write_key(value, key, processed);
            }
            Ok(value)
        }
        ArrayRule::Each(schema) => match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| ctx.descend(item, schema, PathSegment::Index(i)))
                .collect::<SanitizeResult<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, item) in map {
                    let processed = ctx.descend(item, schema, PathSegment::from_key(&key))?;
                    out.insert(key, processed);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other),
        },
        ArrayRule::Scalar => {
            if is_sequential(&value) {
                Ok(value)
            } else {
                Err(ValidationError::new(ErrorKind::ArrScalar).into())
            }
        }
        ArrayRule::Unique => {
            let duplicate = find_loose_duplicate(&elements(&value), ctx.remaining_depth())
                .ok_or_else(|| ConfigError::RecursionLimit(ctx.max_depth()))?;
            if duplicate {
                Err(ValidationError::new(ErrorKind::ArrUnique).into())
            } else {
                Ok(value)
            }
        }
        ArrayRule::Min(min) if elements(&value).len() < *min => {
            Err(ValidationError::new(ErrorKind::ArrMin).with_param("min", *min).into())
        }
        ArrayRule::Max(max) if elements(&value).len() > *max => {
            Err(ValidationError::new(ErrorKind::ArrMax).with_param("max", *max).into())
        }
        ArrayRule::Min(_) | ArrayRule::Max(_) => Ok(value),
    }
}

fn elements(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    }
}

fn is_sequential(value: &Value) -> bool {
    match value {
        Value::Array(_) => true,
        Value::Object(map) => map
            .keys()
            .enumerate()
            .all(|(i, key)| parse_index(key) == Some(i)),
        _ => false,
    }
}

fn read_key(value: &Value, key: &str) -> Value {
    match value {
        Value::Array(items) => parse_index(key)
            .and_then(|i| items.get(i))
            .cloned()
            .unwrap_or(Value::Null),
        Value::Object(map) => map.get(key).cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Writes `item` under `key`. A list stays a list for in-range and append
/// writes; any other key turns it into an object keyed by index strings.
fn write_key(value: Value, key: &str, item: Value) -> Value {
    match value {
        Value::Array(mut items) => match parse_index(key) {
            Some(i) if i < items.len() => {
                items[i] = item;
                Value::Array(items)
            }
            Some(i) if i == items.len() => {
                items.push(item);
                Value::Array(items)
            }
            _ => {
                let mut map: Map<String, Value> = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect();
                map.insert(key.to_string(), item);
                Value::Object(map)
            }
        },
        Value::Object(mut map) => {
            map.insert(key.to_string(), item);
            Value::Object(map)
        }
        other => other,
    }
}
