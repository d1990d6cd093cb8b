//! # beanwatch
//!
//! Command-line host for [`beanwatch_collector`]: loads settings, starts one
//! collector per configured endpoint and runs them until Ctrl-C.
//!
//! ```bash
//! # Validate settings and print what would run
//! beanwatch --config beanwatch.toml --check
//!
//! # Run, with debug logging on stderr
//! beanwatch --config beanwatch.toml --log-level debug
//! ```
//!
//! Measurements and events are written to stdout, one per line:
//!
//! ```text
//! JVM_THREADS 42 app01
//! _bevent:Plugin beanwatch version 0.1.0|m:Collector app01, Unknown host app01.internal, port 8778|h:monitor01|s:app01|t:ERROR
//! ```

pub mod logging;
pub mod runner;
pub mod settings;

pub use settings::{CollectorItem, Settings};
