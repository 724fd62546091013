//! Loose equality and numeric coercion helpers
//!
//! Loose equality follows the rules of dynamically typed hosts the input
//! usually comes from: `true == 1`, `"1" == 1`, `"1.0" == "1"`,
//! `null == false`, `null == ""`.

use std::collections::HashMap;

use serde_json::{Number, Value};

use crate::engine::DEFAULT_MAX_DEPTH;

/// Significant digits kept when a float is rendered as text
const FLOAT_PRECISION: usize = 14;

/// Parses a numeric string: optional surrounding whitespace, optional sign,
/// digits with an optional fraction, optional exponent.
pub(crate) fn numeric_value(raw: &str) -> Option<f64> {
    let s = raw.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C'));
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if i != bytes.len() {
        return None;
    }

    s.parse::<f64>().ok()
}

/// Renders a float with 14 significant digits and never in exponent form.
pub(crate) fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == value.trunc() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let rounded = format!("{:.*e}", FLOAT_PRECISION - 1, value)
        .parse::<f64>()
        .unwrap_or(value);
    format!("{}", rounded)
}

/// Renders a JSON number as text
pub(crate) fn number_to_string(number: &Number) -> String {
    if let Some(i) = number.as_i64() {
        i.to_string()
    } else if let Some(u) = number.as_u64() {
        u.to_string()
    } else {
        format_float(number.as_f64().unwrap_or(0.0))
    }
}

/// Builds a JSON number, preferring the integer form for whole values
pub(crate) fn json_number(value: f64) -> Value {
    if value == value.trunc() && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => a.as_f64() == b.as_f64(),
    }
}

fn entries(value: &Value) -> Option<Vec<(String, &Value)>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        ),
        Value::Object(map) => Some(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
        _ => None,
    }
}

/// Loose equality between two scalars, or structures nested no deeper than
/// `DEFAULT_MAX_DEPTH`. Deeper structures compare unequal.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    loose_eq_within(a, b, DEFAULT_MAX_DEPTH).unwrap_or(false)
}

/// Loose equality that descends at most `depth` structure levels.
///
/// Returns `None` when the comparison needs to go deeper.
pub(crate) fn loose_eq_within(a: &Value, b: &Value, depth: usize) -> Option<bool> {
    let equal = match (a, b) {
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == truthy(other),
        (Value::Null, Value::Null) => true,
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !truthy(other),
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match numeric_value(s) {
                Some(f) => n.as_f64() == Some(f),
                None => number_to_string(n) == *s,
            }
        }
        (Value::String(x), Value::String(y)) => match (numeric_value(x), numeric_value(y)) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        _ => match (entries(a), entries(b)) {
            (Some(left), Some(right)) => {
                if left.len() != right.len() {
                    return Some(false);
                }
                let depth = depth.checked_sub(1)?;
                for (key, value) in &left {
                    let equal = match right.iter().find(|(other_key, _)| other_key == key) {
                        Some((_, other)) => loose_eq_within(value, other, depth)?,
                        None => false,
                    };
                    if !equal {
                        return Some(false);
                    }
                }
                true
            }
            _ => false,
        },
    };
    Some(equal)
}

/// Bucket of values that may be loosely equal to each other
#[derive(Debug, PartialEq, Eq, Hash)]
enum LooseKey<'a> {
    /// Numbers and numeric strings, by normalized `f64` bits
    Numeric(u64),
    /// Non-numeric strings, by their bytes
    Text(&'a str),
    /// Arrays and objects, by their sorted keys
    Compound(Vec<String>),
}

fn numeric_key(f: f64) -> LooseKey<'static> {
    // -0.0 and 0.0 are equal but have different bits
    LooseKey::Numeric(if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() })
}

fn loose_key(value: &Value) -> Option<LooseKey<'_>> {
    match value {
        Value::Null | Value::Bool(_) => None,
        Value::Number(n) => Some(numeric_key(n.as_f64().unwrap_or(0.0))),
        Value::String(s) => Some(match numeric_value(s) {
            Some(f) => numeric_key(f),
            None => LooseKey::Text(s),
        }),
        Value::Array(_) | Value::Object(_) => {
            let mut keys: Vec<String> = entries(value)
                .unwrap_or_default()
                .into_iter()
                .map(|(key, _)| key)
                .collect();
            keys.sort_unstable();
            Some(LooseKey::Compound(keys))
        }
    }
}

/// Returns whether any two of `items` are loosely equal.
///
/// Values only meet values of their own bucket. A number never loosely equals
/// a non-numeric string, and a scalar other than `null` or a bool never equals
/// a structure. `null` and bools can equal anything, so each is checked
/// against every item. At most two of them can be present without a
/// duplicate.
///
/// Returns `None` when comparing nested structures needs more than `depth`
/// levels.
pub(crate) fn find_loose_duplicate(items: &[&Value], depth: usize) -> Option<bool> {
    let mut buckets: HashMap<LooseKey<'_>, Vec<&Value>> = HashMap::new();

    for (i, &item) in items.iter().enumerate() {
        let Some(key) = loose_key(item) else {
            for (j, other) in items.iter().enumerate() {
                if i != j && loose_eq_within(item, other, depth)? {
                    return Some(true);
                }
            }
            continue;
        };

        let bucket = buckets.entry(key).or_default();
        for other in bucket.iter() {
            if loose_eq_within(item, other, depth)? {
                return Some(true);
            }
        }
        bucket.push(item);
    }

    Some(false)
}
