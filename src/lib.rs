//! sanitizer - A strict, rule-based sanitizer for untyped values
//!
//! Validates and normalizes decoded values (`serde_json::Value`) against
//! declaratively built schemas, failing with a coded, path-qualified error.
//!
//! ```ignore
//! use sanitizer::{array, integer, string, Sanitizer, Schema};
//! use serde_json::json;
//!
//! let schema: Schema = array()
//!     .schema([
//!         ("name", Schema::from(string().trim().min(1))),
//!         ("age", integer().between(0, 130)?.into()),
//!     ])
//!     .into();
//!
//! let mut engine = Sanitizer::new();
//! let clean = engine.process(json!({"name": " Ada ", "age": "36"}), &schema)?;
//! assert_eq!(clean, json!({"name": "Ada", "age": 36}));
//! ```

pub mod alias;
pub mod engine;
pub mod errors;
pub mod observability;
pub mod schema;

pub use alias::AliasRegistry;
pub use engine::{process, Sanitizer, SanitizerConfig};
pub use errors::{
    ConfigError, ConfigResult, ErrorKind, MessageCatalog, PathSegment, SanitizeError,
    SanitizeResult, ValidationError,
};
pub use schema::{
    array, boolean, date, decimal, integer, reference, string, ArraySchema, BooleanSchema,
    DateSchema, DecimalSchema, IntegerSchema, Schema, SchemaVariant, StringSchema,
};
