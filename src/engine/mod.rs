//! Processing engine
//!
//! `Sanitizer` is the outermost entry point. It owns the alias registry,
//! dispatches a value to a schema tree and, after every successful outermost
//! call, purges the non-persistent aliases. Nested calls made by array rules
//! go through `Context` and never purge.
//!
//! A failed call leaves the registry as it was, so a caller can fix the
//! input and retry with the same transient aliases.

mod config;
mod context;

pub use config::{SanitizerConfig, DEFAULT_MAX_DEPTH};
pub(crate) use context::Context;

use serde_json::Value;

use crate::alias::AliasRegistry;
use crate::errors::{
    ConfigResult, MessageCatalog, PathSegment, SanitizeError, SanitizeResult, ValidationError,
};
use crate::observability::{Event, Logger, MetricsSnapshot, ProcessMetrics};
use crate::schema::{Schema, SchemaVariant};

/// Sanitization engine with its own alias registry
#[derive(Debug, Default)]
pub struct Sanitizer {
    config: SanitizerConfig,
    aliases: AliasRegistry,
    messages: MessageCatalog,
    metrics: ProcessMetrics,
    logger: Logger,
}

impl Sanitizer {
    /// Creates an engine with the default configuration and an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration.
    ///
    /// The log threshold applies to this engine and its registry only.
    pub fn with_config(config: SanitizerConfig) -> ConfigResult<Self> {
        config.validate()?;
        let logger = Logger::new(config.log_level);
        let max_depth = config.max_depth.to_string();
        logger.log_event(
            Event::ConfigLoaded,
            &[
                ("log_level", config.log_level.as_str()),
                ("max_depth", max_depth.as_str()),
            ],
        );
        Ok(Self {
            config,
            aliases: AliasRegistry::with_logger(logger),
            messages: MessageCatalog::default(),
            metrics: ProcessMetrics::default(),
            logger,
        })
    }

    /// Replaces the message catalog used by `describe`
    pub fn with_messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn aliases_mut(&mut self) -> &mut AliasRegistry {
        &mut self.aliases
    }

    /// See [`AliasRegistry::create`]
    pub fn create_alias(
        &mut self,
        name: &str,
        schema: impl Into<Schema>,
        persistent: bool,
    ) -> ConfigResult<()> {
        self.aliases.create(name, schema, persistent)
    }

    /// See [`AliasRegistry::alias`]
    pub fn alias(&self, name: &str) -> ConfigResult<Schema> {
        self.aliases.alias(name)
    }

    /// See [`AliasRegistry::alias_as`]
    pub fn alias_as<T: SchemaVariant>(&self, name: &str) -> ConfigResult<T> {
        self.aliases.alias_as(name)
    }

    /// See [`AliasRegistry::destroy`]
    pub fn destroy_alias(&mut self, name: &str) -> ConfigResult<()> {
        self.aliases.destroy(name)
    }

    /// Removes every non-persistent alias. Runs automatically after each
    /// successful outermost call.
    pub fn destroy_non_persistent_aliases(&mut self) -> usize {
        let purged = self.aliases.destroy_non_persistent();
        if purged > 0 {
            self.metrics.add_aliases_purged(purged as u64);
            let count = purged.to_string();
            self.logger.log_event(Event::AliasesPurged, &[("count", count.as_str())]);
        }
        purged
    }

    /// Validates and normalizes `input` against `schema`, reporting failures
    /// under the root segment `$`.
    ///
    /// # Errors
    ///
    /// - `SanitizeError::Validation` when the input breaks a rule
    /// - `SanitizeError::Config` when the schema tree cannot be processed
    ///   (undefined alias, depth cap exceeded)
    pub fn process(&mut self, input: Value, schema: &Schema) -> SanitizeResult<Value> {
        self.process_field(input, schema, PathSegment::root())
    }

    /// Same as `process`, with a caller-chosen outermost segment
    pub fn process_field(
        &mut self,
        input: Value,
        schema: &Schema,
        segment: impl Into<PathSegment>,
    ) -> SanitizeResult<Value> {
        let segment = segment.into();
        let segment_text = segment.to_string();
        let result =
            Context::new(&self.aliases, self.config.max_depth).descend(input, schema, segment);

        match &result {
            Ok(_) => {
                self.metrics.increment_processed();
                self.logger.log_event(
                    Event::ProcessComplete,
                    &[("schema", schema.kind_name()), ("segment", segment_text.as_str())],
                );
                self.destroy_non_persistent_aliases();
            }
            Err(SanitizeError::Validation(err)) => {
                self.metrics.increment_rejected();
                let code = err.code().to_string();
                let path = err.path();
                self.logger.log_event(
                    Event::ProcessRejected,
                    &[("code", code.as_str()), ("path", path.as_str())],
                );
            }
            Err(SanitizeError::Config(err)) => {
                self.metrics.increment_misconfigured();
                let reason = err.to_string();
                self.logger.log_event(Event::ProcessMisconfigured, &[("reason", reason.as_str())]);
            }
        }

        result
    }

    /// Renders an error with this engine's message catalog
    pub fn describe(&self, error: &ValidationError) -> String {
        error.render(&self.messages)
    }

    /// Point-in-time copy of this engine's counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Processes `input` with a throwaway engine that has no aliases
pub fn process(input: Value, schema: &Schema) -> SanitizeResult<Value> {
    Sanitizer::new().process(input, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConfigError, ErrorKind};
    use crate::observability::Severity;
    use crate::schema::{array, integer, reference, string, IntegerSchema};
    use serde_json::json;

    #[test]
    fn test_process_returns_coerced_value() {
        let mut engine = Sanitizer::new();
        let schema: Schema = integer().min(1).into();
        assert_eq!(engine.process(json!("5"), &schema).unwrap(), json!(5));
    }

    #[test]
    fn test_root_segment_in_path() {
        let mut engine = Sanitizer::new();
        let schema: Schema = array().schema([("age", integer())]).into();
        let err = engine.process(json!({"age": "x"}), &schema).unwrap_err();
        let err = err.as_validation().unwrap();
        assert_eq!(err.path(), "$.age");
        assert_eq!(err.param("path"), Some(&json!("$.age")));
    }

    #[test]
    fn test_custom_outer_segment() {
        let mut engine = Sanitizer::new();
        let err = engine
            .process_field(json!("x"), &integer().into(), "body")
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().path(), "body");
    }

    #[test]
    fn test_purges_only_non_persistent_on_success() {
        let mut engine = Sanitizer::new();
        engine.create_alias("transient", integer(), false).unwrap();
        engine.create_alias("kept", integer(), true).unwrap();

        let schema: Schema = array().schema([("a", reference("transient"))]).into();
        engine.process(json!({"a": 1}), &schema).unwrap();

        assert!(!engine.aliases().contains("transient"));
        assert!(engine.aliases().contains("kept"));
        assert_eq!(engine.metrics().aliases_purged, 1);
    }

    #[test]
    fn test_failed_call_keeps_aliases() {
        let mut engine = Sanitizer::new();
        engine.create_alias("transient", integer(), false).unwrap();

        let schema = reference("transient");
        assert!(engine.process(json!("x"), &schema).is_err());
        assert!(engine.aliases().contains("transient"));
    }

    #[test]
    fn test_self_reference_hits_depth_cap() {
        let mut engine = Sanitizer::with_config(SanitizerConfig::with_max_depth(10)).unwrap();
        let node = array().schema([("child", reference("node"))]);
        engine.create_alias("node", node, true).unwrap();

        let mut input = json!(null);
        for _ in 0..20 {
            input = json!({ "child": input });
        }
        let err = engine.process(input, &reference("node")).unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::RecursionLimit(10)));
        assert_eq!(engine.metrics().misconfigured, 1);
    }

    #[test]
    fn test_self_reference_within_cap() {
        let mut engine = Sanitizer::new();
        let node = array().optional().schema([
            ("value", Schema::from(integer())),
            ("next", reference("node")),
        ]);
        engine.create_alias("node", node, true).unwrap();

        let input = json!({"value": "1", "next": {"value": "2"}});
        let output = engine.process(input, &reference("node")).unwrap();
        assert_eq!(output, json!({"value": 1, "next": {"value": 2, "next": null}}));

        let err = engine
            .process(json!({"value": 1, "next": {"value": "x"}}), &reference("node"))
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().path(), "$.next.value");
    }

    #[test]
    fn test_metrics_count_outcomes() {
        let mut engine = Sanitizer::new();
        let schema: Schema = string().into();
        engine.process(json!("a"), &schema).unwrap();
        engine.process(json!([]), &schema).unwrap_err();

        let metrics = engine.metrics();
        assert_eq!(metrics.processed, 1);
        assert_eq!(metrics.rejected, 1);
    }

    #[test]
    fn test_describe_uses_catalog() {
        let engine = Sanitizer::new().with_messages(
            MessageCatalog::new().with_template(ErrorKind::IntMin, "Too small, need {{min}}"),
        );
        let err = ValidationError::new(ErrorKind::IntMin).with_param("min", 3);
        assert_eq!(engine.describe(&err), "Too small, need 3");
    }

    #[test]
    fn test_alias_as_through_engine() {
        let mut engine = Sanitizer::new();
        engine.create_alias("age", integer().min(0), false).unwrap();
        let schema: Schema = engine.alias_as::<IntegerSchema>("age").unwrap().max(130).into();
        assert!(engine.process(json!(200), &schema).is_err());
        assert!(engine.alias("age").is_ok());
    }

    #[test]
    fn test_engines_keep_their_own_log_threshold() {
        let verbose = Sanitizer::with_config(SanitizerConfig {
            log_level: Severity::Trace,
            ..Default::default()
        })
        .unwrap();
        let quiet = Sanitizer::with_config(SanitizerConfig {
            log_level: Severity::Error,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(verbose.logger().threshold(), Severity::Trace);
        assert_eq!(quiet.logger().threshold(), Severity::Error);
        assert_eq!(Sanitizer::new().logger().threshold(), Severity::Warn);
    }

    #[test]
    fn test_free_function() {
        assert_eq!(process(json!(1), &integer().into()).unwrap(), json!(1));
    }
}
