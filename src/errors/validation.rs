//! Validation error with an accumulating field path
//!
//! A rule failure starts with an empty chain. Every nesting level the error
//! unwinds through wraps it with one more segment, innermost first, so the
//! reversed chain reads as a dotted path such as `$.favMovies.0.tags.0`.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::kind::ErrorKind;
use super::messages::{interpolate, MessageCatalog};
use super::path::{join_chain, PathSegment};

/// Param name that carries the computed literal path
pub const PATH_PARAM: &str = "path";

/// Placeholder used for sequence positions in the wildcarded path
pub const DEFAULT_WILDCARD: &str = "*";

/// A failed rule, with its params and the field path it failed at.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    kind: ErrorKind,
    params: BTreeMap<String, Value>,
    chain: Vec<PathSegment>,
}

impl ValidationError {
    /// Creates an error for a failing rule, without a path yet
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
            chain: Vec::new(),
        }
    }

    /// Attaches one rule param
    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Wraps a caught error one nesting level further out.
    ///
    /// The new error keeps the cause's kind, params and chain, appends
    /// `segment` when given, and refreshes the `path` param.
    pub fn nested(cause: ValidationError, segment: Option<PathSegment>) -> Self {
        let mut error = cause;
        if let Some(segment) = segment {
            error.chain.push(segment);
        }
        if !error.chain.is_empty() {
            let path = error.path();
            error.params.insert(PATH_PARAM.to_string(), Value::String(path));
        }
        error
    }

    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the stable numeric code
    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    /// Returns the substitution params
    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }

    /// Returns one param
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Returns the path segments, innermost first
    pub fn chain(&self) -> &[PathSegment] {
        &self.chain
    }

    /// Dotted path with literal indices, e.g. `$.favMovies.0.tags.0`
    pub fn path(&self) -> String {
        join_chain(&self.chain, None)
    }

    /// Dotted path with indices replaced by `*`, e.g. `$.favMovies.*.tags.*`
    pub fn wildcard_path(&self) -> String {
        self.wildcard_path_with(DEFAULT_WILDCARD)
    }

    /// Dotted path with indices replaced by `placeholder`
    pub fn wildcard_path_with(&self, placeholder: &str) -> String {
        join_chain(&self.chain, Some(placeholder))
    }

    /// Message built from the built-in templates
    pub fn message(&self) -> String {
        self.render(&MessageCatalog::default())
    }

    /// Message built from the given catalog
    pub fn render(&self, catalog: &MessageCatalog) -> String {
        let mut message = String::new();
        if !self.chain.is_empty() {
            message.push_str(&interpolate(catalog.field_prefix(), &self.params));
        }
        message.push_str(&interpolate(catalog.template(self.kind), &self.params));
        message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}
