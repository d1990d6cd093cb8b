//! # beanwatch-types
//!
//! Core types shared by the beanwatch collector and its outputs: the
//! measurements and events a collector produces, and the catalogue of
//! managed objects it samples.
//!
//! ## Features
//!
//! - `serde`: (de)serialization via serde, used for settings files and
//!   structured outputs
//!
//! ## Example
//!
//! ```rust
//! use beanwatch_types::{Event, ManagedAttribute, ManagedEntry, Measurement, Severity};
//!
//! let entry = ManagedEntry::new("java.lang:type=Threading")
//!     .attribute(ManagedAttribute::new("ThreadCount", "JVM_THREAD_COUNT", "int"));
//! assert_eq!(entry.enabled_attributes().count(), 1);
//!
//! let measurement = Measurement::new("JVM_THREAD_COUNT", "app-01", 42.0);
//! assert!(measurement.timestamp_ms.is_none());
//!
//! let event = Event::builder()
//!     .title("Plugin beanwatch version 0.1.0")
//!     .severity(Severity::Error)
//!     .message("Collector jvm, Unknown host db01, port 9999")
//!     .build();
//! assert_eq!(event.severity, Severity::Error);
//! ```

mod catalogue;
mod event;
mod measurement;
mod plugin;

pub use catalogue::*;
pub use event::*;
pub use measurement::*;
pub use plugin::*;

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
