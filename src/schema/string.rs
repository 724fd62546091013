//! String schema
//!
//! Base coercion accepts strings and numbers and drops control characters.
//! Rules transform (`trim`) or check the working value in declared order.

use std::net::{Ipv4Addr, Ipv6Addr};

use regex::Regex;
use serde_json::Value;
use url::Url;

use super::base::SchemaBase;
use super::loose::{loose_eq, number_to_string};
use crate::errors::{ConfigError, ConfigResult, ErrorKind, ValidationError};

/// Characters removed by the trim rule
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Rules attached to a string schema
#[derive(Debug, Clone)]
pub enum StringRule {
    Trim { left: bool, right: bool },
    Length { min: Option<usize>, max: Option<usize> },
    OneOf { values: Vec<String>, strict: bool },
    NotOneOf { values: Vec<String>, strict: bool },
    Email,
    Ip { v4: bool, v6: bool },
    Url { https_only: bool },
    Regex { regex: Regex, label: String },
}

/// String validator.
///
/// The base pass only removes control characters other than tab, newline and
/// carriage return. Markup and quotes are kept as they are; escaping belongs
/// to whatever renders the value.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    base: SchemaBase<StringRule>,
}

impl StringSchema {
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
    /// `InvalidDefault` unless the default is a string or `null`.
    pub fn optional_with(mut self, default: impl Into<Value>) -> ConfigResult<Self> {
        let default = default.into();
        if !matches!(default, Value::String(_) | Value::Null) {
            return Err(ConfigError::InvalidDefault { expected: "string" });
        }
        self.base.set_optional(default);
        Ok(self)
    }

    /// Trims both ends
    pub fn trim(mut self) -> Self {
        self.base.push(StringRule::Trim {
            left: true,
            right: true,
        });
        self
    }

    /// Trims the selected ends.
    ///
    /// # Errors
    ///
    /// `TrimDisabled` when both sides are disabled.
    pub fn trim_sides(mut self, left: bool, right: bool) -> ConfigResult<Self> {
        if !left && !right {
            return Err(ConfigError::TrimDisabled);
        }
        self.base.push(StringRule::Trim { left, right });
        Ok(self)
    }

    /// Exact length in characters
    pub fn length(mut self, length: usize) -> Self {
        self.base.push(StringRule::Length {
            min: Some(length),
            max: Some(length),
        });
        self
    }

    pub fn min(mut self, length: usize) -> Self {
        self.base.push(StringRule::Length {
            min: Some(length),
            max: None,
        });
        self
    }

    pub fn max(mut self, length: usize) -> Self {
        self.base.push(StringRule::Length {
            min: None,
            max: Some(length),
        });
        self
    }

    /// Value must equal one of `values`; `strict = false` uses loose equality
    pub fn one_of<I, S>(mut self, values: I, strict: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.base.push(StringRule::OneOf { values, strict });
        self
    }

    /// Value must not equal any of `values`
    pub fn not_one_of<I, S>(mut self, values: I, strict: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.base.push(StringRule::NotOneOf { values, strict });
        self
    }

    pub fn email(mut self) -> Self {
        self.base.push(StringRule::Email);
        self
    }

    /// # Errors
    ///
    /// `NoIpFamily` when both families are disabled.
    pub fn ip(mut self, v4: bool, v6: bool) -> ConfigResult<Self> {
        if !v4 && !v6 {
            return Err(ConfigError::NoIpFamily);
        }
        self.base.push(StringRule::Ip { v4, v6 });
        Ok(self)
    }

    pub fn url(mut self, https_only: bool) -> Self {
        self.base.push(StringRule::Url { https_only });
        self
    }

    /// Full-string match against `pattern`. Errors cite `name` when given,
    /// else the raw pattern.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` when the pattern does not compile.
    pub fn regex(mut self, pattern: &str, name: Option<&str>) -> ConfigResult<Self> {
        let regex = compile_anchored(pattern)?;
        self.base.push(StringRule::Regex {
            regex,
            label: name.unwrap_or(pattern).to_string(),
        });
        Ok(self)
    }

    /// Letters only, optionally with `_`/`-` and space
    pub fn alpha(self, dash: bool, space: bool) -> Self {
        self.character_class("a-zA-Z", dash, space, "alpha")
    }

    /// Letters and digits, optionally with `_`/`-` and space
    pub fn alpha_num(self, dash: bool, space: bool) -> Self {
        self.character_class("a-zA-Z0-9", dash, space, "alphaNum")
    }

    fn character_class(mut self, class: &str, dash: bool, space: bool, name: &str) -> Self {
        let pattern = format!(
            "[{}{}{}]+",
            if space { " " } else { "" },
            class,
            if dash { "_-" } else { "" }
        );
        let regex = compile_anchored(&pattern).expect("character class pattern is valid");
        self.base.push(StringRule::Regex {
            regex,
            label: name.to_string(),
        });
        self
    }

    pub fn rules(&self) -> &[StringRule] {
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

    /// Sanitizes the input to a string and applies the rules in order.
    pub fn process(&self, input: Value) -> Result<Value, ValidationError> {
        if let Some(default) = self.base.short_circuit(&input) {
            return Ok(default);
        }

        let raw = match input {
            Value::String(s) => s,
            Value::Number(n) => number_to_string(&n),
            _ => return Err(ValidationError::new(ErrorKind::StrInvalid)),
        };
        let mut value: String = raw
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
            .collect();

        for rule in self.base.rules() {
            value = apply(rule, value)?;
        }

        Ok(Value::String(value))
    }
}

fn compile_anchored(pattern: &str) -> ConfigResult<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn apply(rule: &StringRule, value: String) -> Result<String, ValidationError> {
    match rule {
        StringRule::Trim { left, right } => Ok(match (left, right) {
            (true, true) => value.trim_matches(TRIM_CHARS).to_string(),
            (true, false) => value.trim_start_matches(TRIM_CHARS).to_string(),
            _ => value.trim_end_matches(TRIM_CHARS).to_string(),
        }),
        StringRule::Length { min, max } => {
            let length = value.chars().count();
            if let Some(min) = min.filter(|min| length < *min) {
                return Err(ValidationError::new(ErrorKind::StrMin).with_param("min", min));
            }
            if let Some(max) = max.filter(|max| length > *max) {
                return Err(ValidationError::new(ErrorKind::StrMax).with_param("max", max));
            }
            Ok(value)
        }
        StringRule::OneOf { values, strict } => {
            if contains(values, &value, *strict) {
                Ok(value)
            } else {
                Err(ValidationError::new(ErrorKind::StrOneOf).with_param("values", values.clone()))
            }
        }
        StringRule::NotOneOf { values, strict } => {
            if contains(values, &value, *strict) {
                Err(ValidationError::new(ErrorKind::StrNotOneOf)
                    .with_param("values", values.clone()))
            } else {
                Ok(value)
            }
        }
        StringRule::Email => check(is_email(&value), ErrorKind::StrEmail, value),
        StringRule::Ip { v4, v6 } => {
            let valid = (*v4 && value.parse::<Ipv4Addr>().is_ok())
                || (*v6 && value.parse::<Ipv6Addr>().is_ok());
            check(valid, ErrorKind::StrIp, value)
        }
        StringRule::Url { https_only } => {
            let parsed = Url::parse(&value)
                .ok()
                .filter(|url| url.has_host())
                .ok_or_else(|| ValidationError::new(ErrorKind::StrUrl))?;
            check(!*https_only || parsed.scheme() == "https", ErrorKind::StrUrlNotHttps, value)
        }
        StringRule::Regex { regex, label } => {
            if regex.is_match(&value) {
                Ok(value)
            } else {
                Err(ValidationError::new(ErrorKind::StrRegex).with_param("pattern", label.as_str()))
            }
        }
    }
}

fn check(valid: bool, kind: ErrorKind, value: String) -> Result<String, ValidationError> {
    if valid {
        Ok(value)
    } else {
        Err(ValidationError::new(kind))
    }
}

fn contains(values: &[String], value: &str, strict: bool) -> bool {
    if strict {
        values.iter().any(|v| v == value)
    } else {
        let value = Value::String(value.to_string());
        values
            .iter()
            .any(|v| loose_eq(&value, &Value::String(v.clone())))
    }
}

/// Dotted local part and a multi-label hostname
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };

    const LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~.-";
    let local_ok = !local.is_empty()
        && local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || LOCAL_SPECIALS.contains(c));
    if !local_ok || domain.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(schema: &StringSchema, input: &str) -> Result<Value, ValidationError> {
        schema.process(json!(input))
    }

    #[test]
    fn test_valid_values() {
        let schema = StringSchema::new();
        assert_eq!(schema.process(json!("test")).unwrap(), json!("test"));
        assert_eq!(schema.process(json!("true")).unwrap(), json!("true"));
        assert_eq!(schema.process(json!(123)).unwrap(), json!("123"));
        assert_eq!(schema.process(json!(3.14)).unwrap(), json!("3.14"));
        assert_eq!(schema.process(json!("a\u{0}b\tc")).unwrap(), json!("ab\tc"));
    }

    #[test]
    fn test_markup_and_quotes_are_kept() {
        let input = "<b>\"quoted\" & 'single'</b>";
        assert_eq!(StringSchema::new().process(json!(input)).unwrap(), json!(input));
    }

    #[test]
    fn test_invalid_values() {
        let schema = StringSchema::new();
        for input in [json!(true), json!(null), json!([]), json!({"a": "b"})] {
            assert_eq!(schema.process(input).unwrap_err().kind(), ErrorKind::StrInvalid);
        }
    }

    #[test]
    fn test_trim() {
        let left = StringSchema::new().trim_sides(true, false).unwrap();
        let right = StringSchema::new().trim_sides(false, true).unwrap();
        let both = StringSchema::new().trim();
        assert_eq!(run(&left, "  test  ").unwrap(), json!("test  "));
        assert_eq!(run(&right, "  test  ").unwrap(), json!("  test"));
        assert_eq!(run(&both, "\n test \0").unwrap(), json!("test"));
        assert_eq!(
            StringSchema::new().trim_sides(false, false).unwrap_err(),
            ConfigError::TrimDisabled
        );
    }

    #[test]
    fn test_length() {
        assert!(run(&StringSchema::new().length(4), "test").is_ok());
        assert_eq!(run(&StringSchema::new().length(5), "test").unwrap_err().kind(), ErrorKind::StrMin);
        assert_eq!(run(&StringSchema::new().length(4), "test1").unwrap_err().kind(), ErrorKind::StrMax);

        assert!(run(&StringSchema::new().min(4), "test").is_ok());
        let err = run(&StringSchema::new().min(5), "test").unwrap_err();
        assert_eq!(err.param("min"), Some(&json!(5)));
        assert!(run(&StringSchema::new().max(4), "test").is_ok());
        assert_eq!(run(&StringSchema::new().max(3), "test").unwrap_err().kind(), ErrorKind::StrMax);
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(run(&StringSchema::new().length(4), "ñáéü").is_ok());
        assert!(run(&StringSchema::new().max(2), "日本").is_ok());
    }

    #[test]
    fn test_one_of() {
        let schema = StringSchema::new().one_of(["success", "error"], true);
        assert!(run(&schema, "success").is_ok());
        let err = run(&schema, "unknown").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StrOneOf);
        assert!(err.message().contains("success|error"));

        let strict = StringSchema::new().one_of(["1"], true);
        let loose = StringSchema::new().one_of(["1"], false);
        assert!(run(&strict, "1.0").is_err());
        assert!(run(&loose, "1.0").is_ok());
    }

    #[test]
    fn test_one_of_loose_with_mixed_values() {
        let schema = StringSchema::new().one_of(["10", "abc"], false);
        for accepted in ["10", "10.0", "1e1", " 10", "abc"] {
            assert!(run(&schema, accepted).is_ok(), "{}", accepted);
        }
        for rejected in ["ABC", "abc ", "10abc", "1", ""] {
            assert_eq!(run(&schema, rejected).unwrap_err().kind(), ErrorKind::StrOneOf, "{}", rejected);
        }

        let schema = StringSchema::new().not_one_of(["0", "none"], false);
        assert!(run(&schema, "0.0").is_err());
        assert!(run(&schema, "none").is_err());
        assert!(run(&schema, "None").is_ok());
    }

    #[test]
    fn test_not_one_of() {
        let schema = StringSchema::new().not_one_of(["success", "error"], true);
        assert!(run(&schema, "unknown").is_ok());
        assert_eq!(run(&schema, "success").unwrap_err().kind(), ErrorKind::StrNotOneOf);
    }

    #[test]
    fn test_email() {
        let schema = StringSchema::new().email();
        assert!(run(&schema, "firstname.lastname@mailprovider.org").is_ok());
        for input in ["@mailprovider.org", "firstname.lastname@mailprovider", "a..b@site.org", "a@-site.org"] {
            assert_eq!(run(&schema, input).unwrap_err().kind(), ErrorKind::StrEmail);
        }
    }

    #[test]
    fn test_ip() {
        let v4 = StringSchema::new().ip(true, false).unwrap();
        let both = StringSchema::new().ip(true, true).unwrap();
        let v6 = StringSchema::new().ip(false, true).unwrap();
        assert!(run(&v4, "127.0.0.1").is_ok());
        assert!(run(&v4, "255.255.255.255").is_ok());
        assert!(run(&both, "1200:0000:AB00:1234:0000:2552:7777:1313").is_ok());
        assert!(run(&v6, "1200:0000:AB00:1234:0000:2552:7777:1313").is_ok());

        assert_eq!(run(&v4, "255.255.255.256").unwrap_err().kind(), ErrorKind::StrIp);
        assert_eq!(run(&both, "1200::AB00:1234::2552:7777:1313").unwrap_err().kind(), ErrorKind::StrIp);
        assert!(run(&v6, "127.0.0.1").is_err());
        assert_eq!(StringSchema::new().ip(false, false).unwrap_err(), ConfigError::NoIpFamily);
    }

    #[test]
    fn test_url() {
        assert!(run(&StringSchema::new().url(false), "http://site.org").is_ok());
        assert!(run(&StringSchema::new().url(false), "https://site.org?param1=1&param2=2").is_ok());
        assert!(run(&StringSchema::new().url(true), "https://site.org").is_ok());

        let err = run(&StringSchema::new().url(true), "http://site.org").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StrUrlNotHttps);
        let err = run(&StringSchema::new().url(false), "site").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StrUrl);
    }

    #[test]
    fn test_alpha() {
        assert!(run(&StringSchema::new().alpha(false, false), "test").is_ok());
        assert!(run(&StringSchema::new().alpha(true, false), "test-").is_ok());
        assert!(run(&StringSchema::new().alpha(true, false), "test_").is_ok());
        assert!(run(&StringSchema::new().alpha(true, true), "test ").is_ok());

        for (input, dash, space) in [("test1", false, false), ("test-", false, false), ("test ", true, false)] {
            let err = run(&StringSchema::new().alpha(dash, space), input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::StrRegex);
            assert_eq!(err.param("pattern"), Some(&json!("alpha")));
        }
    }

    #[test]
    fn test_alpha_num() {
        assert!(run(&StringSchema::new().alpha_num(false, false), "test1").is_ok());
        assert!(run(&StringSchema::new().alpha_num(true, false), "test1-").is_ok());
        assert!(run(&StringSchema::new().alpha_num(true, true), "test1 ").is_ok());
        let err = run(&StringSchema::new().alpha_num(false, false), "marvel ").unwrap_err();
        assert_eq!(
            err.message(),
            "Provided string does not match the alphaNum pattern."
        );
    }

    #[test]
    fn test_regex() {
        let schema = StringSchema::new().regex("#[a-f0-9]{6}", None).unwrap();
        assert_eq!(run(&schema, "#d3d3d3").unwrap(), json!("#d3d3d3"));
        let err = run(&schema, "#d3d3d3ff").unwrap_err();
        assert_eq!(err.param("pattern"), Some(&json!("#[a-f0-9]{6}")));

        let named = StringSchema::new().regex("[0-9]+", Some("digits")).unwrap();
        assert!(run(&named, "12a").unwrap_err().message().contains("digits"));

        assert!(matches!(
            StringSchema::new().regex("(", None).unwrap_err(),
            ConfigError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_rules_run_in_order() {
        let trim_first = StringSchema::new().trim().alpha(false, false);
        let check_first = StringSchema::new().alpha(false, false).trim();
        assert_eq!(run(&trim_first, " test ").unwrap(), json!("test"));
        assert!(run(&check_first, " test ").is_err());
    }

    #[test]
    fn test_optional() {
        let schema = StringSchema::new().optional_with("test").unwrap();
        assert_eq!(schema.process(Value::Null).unwrap(), json!("test"));
        for default in [json!([]), json!(true), json!(1)] {
            assert_eq!(
                StringSchema::new().optional_with(default).unwrap_err().to_string(),
                "Trying to set non-string default value for string schema."
            );
        }
    }
}
