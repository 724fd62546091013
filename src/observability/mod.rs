//! Observability for the sanitizer
//!
//! - Structured logging (JSON lines)
//! - Per-engine counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on processing results
//! 3. No async or background threads
//! 4. Deterministic output

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, ProcessMetrics};

impl Logger {
    /// Log an event at its own severity, with fields
    pub fn log_event(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(event.severity(), event.as_str(), fields);
    }
}
