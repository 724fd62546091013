//! Recursion context for nested processing
//!
//! Array rules recurse through `Context::descend`, never through the
//! outermost engine call, so nested calls cannot purge aliases.
//!
//! Two counters share the `max_depth` cap:
//! - `depth`: document levels entered through `descend`
//! - `hops`: alias references followed since the last `descend`, which
//!   catches alias cycles that never enter the document

use serde_json::Value;

use crate::alias::AliasRegistry;
use crate::errors::{ConfigError, PathSegment, SanitizeError, SanitizeResult, ValidationError};
use crate::schema::Schema;

/// Borrowed state for one outermost call
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    aliases: &'a AliasRegistry,
    depth: usize,
    hops: usize,
    max_depth: usize,
}

impl<'a> Context<'a> {
    pub(crate) fn new(aliases: &'a AliasRegistry, max_depth: usize) -> Self {
        Self {
            aliases,
            depth: 0,
            hops: 0,
            max_depth,
        }
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Document levels left below the current one
    pub(crate) fn remaining_depth(&self) -> usize {
        self.max_depth - self.depth
    }

    /// Processes `input` one level deeper and tags any validation failure
    /// with `segment`.
    pub(crate) fn descend(
        &self,
        input: Value,
        schema: &Schema,
        segment: PathSegment,
    ) -> SanitizeResult<Value> {
        let child = self.deeper()?;
        schema.process(input, &child).map_err(|err| match err {
            SanitizeError::Validation(cause) => {
                ValidationError::nested(cause, Some(segment)).into()
            }
            other => other,
        })
    }

    /// Processes `input` with the alias registered as `name`.
    ///
    /// A reference adds no path segment and no document level. Chains of
    /// references that never descend are capped separately.
    pub(crate) fn resolve(&self, name: &str, input: Value) -> SanitizeResult<Value> {
        let schema = self
            .aliases
            .get(name)
            .ok_or_else(|| ConfigError::UndefinedAlias(name.to_string()))?;
        if self.hops >= self.max_depth {
            return Err(ConfigError::RecursionLimit(self.max_depth).into());
        }
        let child = Context {
            hops: self.hops + 1,
            ..*self
        };
        schema.process(input, &child)
    }

    fn deeper(&self) -> Result<Context<'a>, ConfigError> {
        if self.depth >= self.max_depth {
            return Err(ConfigError::RecursionLimit(self.max_depth));
        }
        Ok(Context {
            depth: self.depth + 1,
            hops: 0,
            ..*self
        })
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::schema::{array, integer, reference};
    use serde_json::json;

    #[test]
    fn test_descend_tags_segment() {
        let aliases = AliasRegistry::new();
        let ctx = Context::new(&aliases, 8);
        let err = ctx
            .descend(json!("x"), &integer().into(), PathSegment::from_key("age"))
            .unwrap_err();
        let err = err.as_validation().unwrap();
        assert_eq!(err.kind(), ErrorKind::IntInvalid);
        assert_eq!(err.path(), "age");
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_depth_cap() {
        let aliases = AliasRegistry::new();
        let ctx = Context::new(&aliases, 1);
        let nested = array().each(integer());
        let err = ctx
            .descend(json!([1]), &nested.into(), PathSegment::root())
            .unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::RecursionLimit(1)));
    }

    #[test]
    fn test_undefined_reference() {
        let aliases = AliasRegistry::new();
        let ctx = Context::new(&aliases, 8);
        let err = ctx
            .descend(json!(1), &reference("missing"), PathSegment::root())
            .unwrap_err();
        assert_eq!(
            err.as_config(),
            Some(&ConfigError::UndefinedAlias("missing".into()))
        );
    }

    #[test]
    fn test_references_do_not_use_document_depth() {
        let mut aliases = AliasRegistry::new();
        aliases.create("item", integer(), true).unwrap();
        let ctx = Context::new(&aliases, 3);

        let schema = array().each(array().each(reference("item")));
        let output = ctx
            .descend(json!([["1"]]), &schema.into(), PathSegment::root())
            .unwrap();
        assert_eq!(output, json!([[1]]));
        assert_eq!(ctx.remaining_depth(), 3);
    }

    #[test]
    fn test_reference_cycle_hits_cap() {
        let mut aliases = AliasRegistry::new();
        aliases.create("a", reference("b"), true).unwrap();
        aliases.create("b", reference("a"), true).unwrap();
        let ctx = Context::new(&aliases, 8);

        let err = ctx
            .descend(json!(1), &reference("a"), PathSegment::root())
            .unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::RecursionLimit(8)));
    }
}
