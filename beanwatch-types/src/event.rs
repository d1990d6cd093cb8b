//! Events - operational problems reported next to the measurement stream.

use std::fmt;

use crate::current_timestamp_ms;

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Upper-case name as used on the wire (`INFO`, `WARN`, `ERROR`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operational event, e.g. a failed connection attempt.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub title: String,
    pub source: String,
    pub host: String,
    pub severity: Severity,
    pub message: String,
    /// Unix timestamp in milliseconds when the event was built.
    pub timestamp_ms: u64,
}

impl Event {
    /// Create a builder for constructing events.
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }
}

/// Builder for constructing `Event` instances.
///
/// Unset text fields default to empty strings and severity defaults to
/// `Info`. The timestamp is taken at `build()` unless set explicitly.
#[derive(Debug, Default)]
pub struct EventBuilder {
    title: String,
    source: String,
    host: String,
    severity: Option<Severity>,
    message: String,
    timestamp_ms: Option<u64>,
}

impl EventBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    /// Build the event.
    pub fn build(self) -> Event {
        Event {
            title: self.title,
            source: self.source,
            host: self.host,
            severity: self.severity.unwrap_or(Severity::Info),
            message: self.message,
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
        }
    }
}
