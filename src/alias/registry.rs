//! Alias registry
//!
//! Named schema templates. Entries are frozen once registered: `alias`
//! hands out clones whose rule lists are shared with the template until the
//! clone is configured, at which point the clone copies its list.

use std::collections::HashMap;

use crate::errors::{ConfigError, ConfigResult};
use crate::observability::{Event, Logger};
use crate::schema::{Schema, SchemaVariant};

#[derive(Debug, Clone)]
struct AliasEntry {
    schema: Schema,
    persistent: bool,
}

/// Named schema store with per-entry persistence
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    entries: HashMap<String, AliasEntry>,
    logger: Logger,
}

impl AliasRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that logs through `logger`.
    pub fn with_logger(logger: Logger) -> Self {
        Self {
            entries: HashMap::new(),
            logger,
        }
    }

    /// Registers `schema` under `name` and marks it as a template.
    ///
    /// Non-persistent entries are purged after the next successful
    /// outermost process call.
    ///
    /// # Errors
    ///
    /// `AliasExists` if the name is taken.
    pub fn create(
        &mut self,
        name: &str,
        schema: impl Into<Schema>,
        persistent: bool,
    ) -> ConfigResult<()> {
        if self.entries.contains_key(name) {
            return Err(ConfigError::AliasExists(name.to_string()));
        }

        let mut schema = schema.into();
        schema.mark_aliased();
        self.entries
            .insert(name.to_string(), AliasEntry { schema, persistent });

        self.logger.log_event(
            Event::AliasCreated,
            &[("alias", name), ("persistent", if persistent { "true" } else { "false" })],
        );
        Ok(())
    }

    /// Returns a copy of the template registered as `name`.
    ///
    /// # Errors
    ///
    /// `UndefinedAlias` if nothing is registered under the name.
    pub fn alias(&self, name: &str) -> ConfigResult<Schema> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UndefinedAlias(name.to_string()))
    }

    /// Returns a copy of the template as its concrete variant, ready to be
    /// configured further.
    ///
    /// # Errors
    ///
    /// `UndefinedAlias` if nothing is registered under the name,
    /// `AliasKindMismatch` if the template is another variant.
    pub fn alias_as<T: SchemaVariant>(&self, name: &str) -> ConfigResult<T> {
        let schema = self.alias(name)?;
        T::from_schema(schema).map_err(|other| ConfigError::AliasKindMismatch {
            name: name.to_string(),
            expected: T::KIND,
            actual: other.kind_name(),
        })
    }

    /// Borrows the template registered as `name`.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries.get(name).map(|entry| &entry.schema)
    }

    /// Removes one entry, persistent or not.
    ///
    /// # Errors
    ///
    /// `UndefinedAlias` if nothing is registered under the name.
    pub fn destroy(&mut self, name: &str) -> ConfigResult<()> {
        if self.entries.remove(name).is_none() {
            return Err(ConfigError::UndefinedAlias(name.to_string()));
        }
        self.logger.log_event(Event::AliasDestroyed, &[("alias", name)]);
        Ok(())
    }

    /// Removes every non-persistent entry and returns how many were removed.
    pub fn destroy_non_persistent(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.persistent);
        before - self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns `None` for unknown names
    pub fn is_persistent(&self, name: &str) -> Option<bool> {
        self.entries.get(name).map(|entry| entry.persistent)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
