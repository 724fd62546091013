//! State shared by every schema variant

use std::sync::Arc;

use serde_json::Value;

/// Optional flag, default value, ordered rules and the template flag.
///
/// Rules live behind an `Arc` so an alias template and the copies handed out
/// by the registry share one list until a copy is configured. Every
/// configuration call goes through `push` or `set_optional`, which clears
/// `aliased` and clones the list if it is still shared.
#[derive(Debug, Clone)]
pub(crate) struct SchemaBase<R> {
    optional: bool,
    default: Value,
    rules: Arc<Vec<R>>,
    aliased: bool,
}

impl<R: Clone> SchemaBase<R> {
    pub(crate) fn new() -> Self {
        Self {
            optional: false,
            default: Value::Null,
            rules: Arc::new(Vec::new()),
            aliased: false,
        }
    }

    /// Appends a rule; rules are never removed or reordered
    pub(crate) fn push(&mut self, rule: R) {
        self.aliased = false;
        Arc::make_mut(&mut self.rules).push(rule);
    }

    pub(crate) fn set_optional(&mut self, default: Value) {
        self.aliased = false;
        self.optional = true;
        self.default = default;
    }

    pub(crate) fn rules(&self) -> &[R] {
        &self.rules
    }

    pub(crate) fn is_optional(&self) -> bool {
        self.optional
    }

    pub(crate) fn default_value(&self) -> &Value {
        &self.default
    }

    pub(crate) fn is_aliased(&self) -> bool {
        self.aliased
    }

    pub(crate) fn mark_aliased(&mut self) {
        self.aliased = true;
    }

    /// Returns the default when `input` is absent and the schema is optional.
    pub(crate) fn short_circuit(&self, input: &Value) -> Option<Value> {
        if self.optional && input.is_null() {
            Some(self.default.clone())
        } else {
            None
        }
    }

    /// Same as `short_circuit`, with a caller-supplied absence test
    pub(crate) fn short_circuit_if(&self, absent: bool) -> Option<Value> {
        if self.optional && absent {
            Some(self.default.clone())
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn shares_rules_with(&self, other: &SchemaBase<R>) -> bool {
        Arc::ptr_eq(&self.rules, &other.rules)
    }
}

impl<R: Clone> Default for SchemaBase<R> {
    fn default() -> Self {
        Self::new()
    }
}
