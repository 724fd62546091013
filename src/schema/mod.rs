//! Schema variants
//!
//! A `Schema` is a tagged union over the variant builders. Builders are
//! configured fluently and converted into `Schema` where a tree is needed:
//!
//! ```ignore
//! let movie = array().schema([
//!     ("title", Schema::from(string().trim().min(1))),
//!     ("tags", array().scalar().each(string().alpha_num(false, false)).into()),
//! ]);
//! ```
//!
//! Every variant follows the same contract:
//! - an absent input (`null`; for arrays also `[]`/`{}`) returns the default
//!   when the schema is optional, without running any rule
//! - otherwise the input is coerced to the variant's canonical form
//! - rules run in declaration order and the first failure aborts

pub mod array;
mod base;
pub mod boolean;
pub mod date;
pub mod decimal;
pub mod integer;
pub(crate) mod loose;
pub mod string;

pub use array::{ArrayRule, ArraySchema};
pub use boolean::BooleanSchema;
pub use date::{DateRule, DateSchema};
pub use decimal::{DecimalRule, DecimalSchema};
pub use integer::{IntegerRule, IntegerSchema};
pub use string::{StringRule, StringSchema};

use serde_json::Value;

use crate::engine::Context;
use crate::errors::SanitizeResult;

/// Any schema
#[derive(Debug, Clone)]
pub enum Schema {
    Boolean(BooleanSchema),
    Integer(IntegerSchema),
    Decimal(DecimalSchema),
    String(StringSchema),
    Date(DateSchema),
    Array(ArraySchema),
    /// Named alias, resolved against the engine's registry at process time
    Ref(String),
}

impl Schema {
    /// Variant name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::Boolean(_) => BooleanSchema::KIND,
            Schema::Integer(_) => IntegerSchema::KIND,
            Schema::Decimal(_) => DecimalSchema::KIND,
            Schema::String(_) => StringSchema::KIND,
            Schema::Date(_) => DateSchema::KIND,
            Schema::Array(_) => ArraySchema::KIND,
            Schema::Ref(_) => "reference",
        }
    }

    pub fn is_optional(&self) -> bool {
        match self {
            Schema::Boolean(s) => s.is_optional(),
            Schema::Integer(s) => s.is_optional(),
            Schema::Decimal(s) => s.is_optional(),
            Schema::String(s) => s.is_optional(),
            Schema::Date(s) => s.is_optional(),
            Schema::Array(s) => s.is_optional(),
            Schema::Ref(_) => false,
        }
    }

    /// Whether this instance is a registered template
    pub fn is_aliased(&self) -> bool {
        match self {
            Schema::Boolean(s) => s.is_aliased(),
            Schema::Integer(s) => s.is_aliased(),
            Schema::Decimal(s) => s.is_aliased(),
            Schema::String(s) => s.is_aliased(),
            Schema::Date(s) => s.is_aliased(),
            Schema::Array(s) => s.is_aliased(),
            Schema::Ref(_) => false,
        }
    }

    pub(crate) fn mark_aliased(&mut self) {
        match self {
            Schema::Boolean(s) => s.mark_aliased(),
            Schema::Integer(s) => s.mark_aliased(),
            Schema::Decimal(s) => s.mark_aliased(),
            Schema::String(s) => s.mark_aliased(),
            Schema::Date(s) => s.mark_aliased(),
            Schema::Array(s) => s.mark_aliased(),
            Schema::Ref(_) => {}
        }
    }

    /// Single dispatch over the variant tag
    pub(crate) fn process(&self, input: Value, ctx: &Context<'_>) -> SanitizeResult<Value> {
        match self {
            Schema::Boolean(s) => Ok(s.process(input)?),
            Schema::Integer(s) => Ok(s.process(input)?),
            Schema::Decimal(s) => Ok(s.process(input)?),
            Schema::String(s) => Ok(s.process(input)?),
            Schema::Date(s) => Ok(s.process(input)?),
            Schema::Array(s) => s.process(input, ctx),
            Schema::Ref(name) => ctx.resolve(name, input),
        }
    }
}

/// A concrete variant that can be recovered from a `Schema`
pub trait SchemaVariant: Into<Schema> + Sized {
    /// Variant name
    const KIND: &'static str;

    /// Unwraps the variant, or hands the schema back if the tag differs
    fn from_schema(schema: Schema) -> Result<Self, Schema>;
}

macro_rules! schema_variant {
    ($ty:ident, $tag:ident, $kind:literal) => {
        impl From<$ty> for Schema {
            fn from(schema: $ty) -> Self {
                Schema::$tag(schema)
            }
        }

        impl SchemaVariant for $ty {
            const KIND: &'static str = $kind;

            fn from_schema(schema: Schema) -> Result<Self, Schema> {
                match schema {
                    Schema::$tag(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

schema_variant!(BooleanSchema, Boolean, "boolean");
schema_variant!(IntegerSchema, Integer, "integer");
schema_variant!(DecimalSchema, Decimal, "decimal");
schema_variant!(StringSchema, String, "string");
schema_variant!(DateSchema, Date, "date");
schema_variant!(ArraySchema, Array, "array");

pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}

pub fn integer() -> IntegerSchema {
    IntegerSchema::new()
}

pub fn decimal() -> DecimalSchema {
    DecimalSchema::new()
}

pub fn string() -> StringSchema {
    StringSchema::new()
}

/// Date schema for the given format, e.g. `"Y-m-d H:i:s"`
pub fn date(format: &str) -> DateSchema {
    DateSchema::new(format)
}

pub fn array() -> ArraySchema {
    ArraySchema::new()
}

/// Lazy reference to a registered alias.
///
/// Resolved each time it is processed, so a schema can refer to itself
/// through its own alias name.
pub fn reference(name: impl Into<String>) -> Schema {
    Schema::Ref(name.into())
}
