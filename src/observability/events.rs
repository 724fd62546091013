//! Observable sanitizer events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in the sanitizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Alias registry
    /// Alias registered
    AliasCreated,
    /// Alias removed explicitly
    AliasDestroyed,
    /// Non-persistent aliases purged after an outermost call
    AliasesPurged,

    // Processing
    /// Outermost call returned a value
    ProcessComplete,
    /// Outermost call rejected its input
    ProcessRejected,
    /// Outermost call hit a configuration error
    ProcessMisconfigured,

    // Configuration
    /// Engine configuration loaded
    ConfigLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::AliasCreated => "ALIAS_CREATED",
            Event::AliasDestroyed => "ALIAS_DESTROYED",
            Event::AliasesPurged => "ALIASES_PURGED",
            Event::ProcessComplete => "PROCESS_COMPLETE",
            Event::ProcessRejected => "PROCESS_REJECTED",
            Event::ProcessMisconfigured => "PROCESS_MISCONFIGURED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ProcessComplete | Event::ProcessRejected => Severity::Trace,
            Event::ProcessMisconfigured => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::AliasCreated,
            Event::AliasDestroyed,
            Event::AliasesPurged,
            Event::ProcessComplete,
            Event::ProcessRejected,
            Event::ProcessMisconfigured,
            Event::ConfigLoaded,
        ];
        for event in events {
            assert!(!event.as_str().is_empty());
            assert_eq!(event.as_str(), event.as_str().to_uppercase());
        }
    }

    #[test]
    fn test_rejections_are_not_warnings() {
        assert_eq!(Event::ProcessRejected.severity(), Severity::Trace);
        assert_eq!(Event::ProcessMisconfigured.severity(), Severity::Warn);
    }
}
