//! Message templates keyed by error kind
//!
//! Templates use `{{name}}` placeholders filled from the error params.
//! Array-valued params are joined with `|`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::kind::ErrorKind;
use super::ConfigError;

/// Prefix prepended to every message whose error carries a field path.
pub const DEFAULT_FIELD_PREFIX: &str = "Validation for field {{path}} has failed. ";

/// Built-in English template for a kind
pub fn default_template(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ArrInvalid => "Invalid array value.",
        ErrorKind::ArrScalar => "Array is not scalar.",
        ErrorKind::ArrUnique => "Values are not unique.",
        ErrorKind::ArrMin => "Array should contain at least {{min}} elements.",
        ErrorKind::ArrMax => "Array should contain at most {{max}} elements.",
        ErrorKind::BoolInvalid => "Expected boolean value.",
        ErrorKind::DateInvalid => "Not a valid date.",
        ErrorKind::DateBefore => "Date should be before {{date}}.",
        ErrorKind::DateAfter => "Date should be after {{date}}.",
        ErrorKind::IntInvalid => "Invalid integer value.",
        ErrorKind::IntMin => "Value is less than expected minimum of {{min}}.",
        ErrorKind::IntMax => "Value is more than expected maximum of {{max}}.",
        ErrorKind::IntEquals => "Value does not equal expected {{expected}}.",
        ErrorKind::IntNotEquals => "Value should not equal {{unexpected}}.",
        ErrorKind::IntOneOf => "Value should be one of ({{values}}).",
        ErrorKind::IntNotOneOf => "Value should not be one of ({{values}}).",
        ErrorKind::StrInvalid => "Invalid string value.",
        ErrorKind::StrMin => "String length is below expected minimum of {{min}} characters.",
        ErrorKind::StrMax => "String length is above expected maximum of {{max}} characters.",
        ErrorKind::StrOneOf => "Value should be one of ({{values}}).",
        ErrorKind::StrNotOneOf => "Value should not be one of ({{values}}).",
        ErrorKind::StrEmail => "Not a valid email.",
        ErrorKind::StrIp => "Not a valid IP address.",
        ErrorKind::StrUrl => "Not a valid URL.",
        ErrorKind::StrUrlNotHttps => "URL is not HTTPS.",
        ErrorKind::StrRegex => "Provided string does not match the {{pattern}} pattern.",
        ErrorKind::DecInvalid => "Invalid decimal value.",
        ErrorKind::DecMin => "Value is less than expected minimum of {{min}}.",
        ErrorKind::DecMax => "Value is more than expected maximum of {{max}}.",
    }
}

/// Lookup table from error kind to message template.
///
/// Kinds without an override fall back to the built-in template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    field_prefix: Option<String>,
    overrides: HashMap<ErrorKind, String>,
}

/// On-disk shape of a catalog: `{"field_prefix": "...", "templates": {"404": "..."}}`
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    field_prefix: Option<String>,
    #[serde(default)]
    templates: BTreeMap<u16, String>,
}

impl MessageCatalog {
    /// Creates a catalog with only the built-in templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the template for one kind
    pub fn with_template(mut self, kind: ErrorKind, template: impl Into<String>) -> Self {
        self.overrides.insert(kind, template.into());
        self
    }

    /// Overrides the field prefix
    pub fn with_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.field_prefix = Some(prefix.into());
        self
    }

    /// Parses a catalog from JSON, keyed by numeric error code.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(raw)
            .map_err(|e| ConfigError::InvalidConfig(format!("malformed message catalog: {}", e)))?;

        let mut catalog = MessageCatalog {
            field_prefix: file.field_prefix,
            overrides: HashMap::new(),
        };
        for (code, template) in file.templates {
            let kind = ErrorKind::from_code(code).ok_or_else(|| {
                ConfigError::InvalidConfig(format!(
                    "unknown error code {} in message catalog",
                    code
                ))
            })?;
            catalog.overrides.insert(kind, template);
        }

        Ok(catalog)
    }

    /// Loads a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// Returns the template used for a kind
    pub fn template(&self, kind: ErrorKind) -> &str {
        self.overrides
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| default_template(kind))
    }

    /// Returns the field prefix template
    pub fn field_prefix(&self) -> &str {
        self.field_prefix.as_deref().unwrap_or(DEFAULT_FIELD_PREFIX)
    }
}

/// Substitutes `{{name}}` placeholders from params.
///
/// Unknown placeholders are left as they are.
pub fn interpolate(template: &str, params: &BTreeMap<String, Value>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match params.get(name) {
                    Some(value) => output.push_str(&render_param(value)),
                    None => {
                        output.push_str("{{");
                        output.push_str(name);
                        output.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);

    output
}

/// Renders one param value for display
pub(crate) fn render_param(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_param).collect::<Vec<_>>().join("|"),
        other => other.to_string(),
    }
}
