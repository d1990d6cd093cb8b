//! # beanwatch-collector
//!
//! Long-running collectors that sample numeric attributes of managed objects
//! and forward them as measurements.
//!
//! Each [`Collector`] owns one endpoint and runs a small state machine:
//!
//! ```text
//! Initializing ─▶ Connecting ─▶ Connected ─▶ Collecting ─▶ Terminated ─▶ Exit
//!                     ▲  │                      │
//!                     │  └──────(cancel)────────┼──────────▶ Terminated
//!                     └────── Disconnected ◀────┘ (session lost)
//! ```
//!
//! - **Connecting** retries every 10 seconds, forever, reporting each failure
//!   as an ERROR event.
//! - **Collecting** runs one pass over the catalogue per poll interval. The
//!   wait after a pass is shortened by the time the pass took.
//! - Per-attribute and per-entry failures are logged and skipped; only a
//!   session failure forces a reconnect.
//!
//! ## Supported Endpoints
//!
//! - **Jolokia** (`jolokia` feature) - JMX over the Jolokia HTTP/JSON agent
//! - Anything else by implementing [`ManagementClient`] and
//!   [`ManagementSession`]
//!
//! ## Quick Start (Jolokia)
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use beanwatch_collector::jolokia::JolokiaClient;
//! use beanwatch_collector::{Collector, CollectorConfig, Shutdown};
//! use beanwatch_types::{ManagedAttribute, ManagedEntry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalogue = Arc::new(vec![ManagedEntry::new("java.lang:type=Threading")
//!         .attribute(ManagedAttribute::new("ThreadCount", "JVM_THREADS", "int"))]);
//!
//!     let config = CollectorConfig::new("localhost", 8778, 5000)?;
//!     let (shutdown, signal) = Shutdown::new();
//!
//!     let collector = Collector::builder("jvm", config, JolokiaClient::builder().build()?)
//!         .catalogue(catalogue)
//!         .build(signal);
//!
//!     let task = tokio::spawn(collector.run());
//!     tokio::signal::ctrl_c().await?;
//!     shutdown.trigger();
//!     task.await?;
//!     Ok(())
//! }
//! ```

mod attribute;
mod client;
mod collector;
mod config;
mod connection;
mod diagnostics;
pub mod error;
mod extractor;
mod hostname;
mod output;
mod scheduler;
mod shutdown;
mod state;

#[cfg(feature = "jolokia")]
pub mod jolokia;

#[cfg(test)]
mod testing;

pub use attribute::{AttributeCollector, PassSummary, ReadFailure, SkipReason};
pub use client::{ManagementClient, ManagementSession, ObjectInstance, SessionHandle};
pub use collector::{Collector, CollectorBuilder};
pub use config::{CollectorConfig, Credentials, Endpoint};
pub use connection::{Cancelled, ConnectionManager, DEFAULT_RETRY_DELAY};
pub use diagnostics::{ConnectFailure, Diagnostics, Reporter};
pub use error::{ConfigError, ConnectError, ExtractError, LookupError, ReadError, SessionError};
pub use extractor::{AttributeValueExtractor, NumericExtractor};
pub use hostname::local_hostname;
pub use output::{EventSink, MeasurementSink, Output, Record};
pub use scheduler::PollScheduler;
pub use shutdown::{Shutdown, ShutdownSignal, Wake};
pub use state::CollectorState;

// Re-export types for convenience
pub use beanwatch_types::{
    Event, ManagedAttribute, ManagedEntry, Measurement, PluginMetadata, Severity,
};
