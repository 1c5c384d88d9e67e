//! Semantic run events.
//!
//! The engine reports what happened (level + message) and leaves timestamps,
//! formatting and destinations to the sink.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;

/// Severity of a run event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
    Success,
}

impl EventLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer of run events.
pub trait EventSink {
    fn emit(&self, level: EventLevel, message: &str);

    fn info(&self, message: &str) {
        self.emit(EventLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(EventLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(EventLevel::Error, message);
    }

    fn success(&self, message: &str) {
        self.emit(EventLevel::Success, message);
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, level: EventLevel, message: &str) {
        match level {
            EventLevel::Info => tracing::info!("{message}"),
            EventLevel::Warn => tracing::warn!("{message}"),
            EventLevel::Error => tracing::error!("{message}"),
            EventLevel::Success => tracing::info!(outcome = "success", "{message}"),
        }
    }
}

/// A recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub level: EventLevel,
    pub message: String,
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<Event>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Messages emitted at `level`.
    #[must_use]
    pub fn messages(&self, level: EventLevel) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, level: EventLevel, message: &str) {
        self.events.borrow_mut().push(Event {
            level,
            message: message.to_string(),
        });
    }
}
