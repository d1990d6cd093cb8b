//! Diagnostics raised by collectors.
//!
//! Collectors never log or emit events directly; they report what happened
//! through [`Diagnostics`]. [`Reporter`] is the standard implementation: it
//! logs through `tracing` and turns connection failures into ERROR events.

use std::sync::Arc;
use std::time::Duration;

use beanwatch_types::{Event, ManagedAttribute, ManagedEntry, PluginMetadata, Severity};
use tracing::{debug, error, info, warn};

use crate::{
    CollectorState, ConnectError, Endpoint, EventSink, LookupError, PassSummary, SessionError,
    SkipReason,
};

/// A failed connection attempt.
#[derive(Debug, Clone, Copy)]
pub struct ConnectFailure<'a> {
    pub collector: &'a str,
    pub source: &'a str,
    pub endpoint: &'a Endpoint,
    pub error: &'a ConnectError,
}

impl ConnectFailure<'_> {
    /// Human-readable description naming collector, host and port.
    pub fn message(&self) -> String {
        let what = match self.error {
            ConnectError::UnknownHost(_) => "Unknown host",
            ConnectError::NoRoute(_) => "No route to host",
            ConnectError::Io(_) => "Failed to connect to management endpoint at host",
        };
        format!(
            "Collector {}, {} {}, port {}",
            self.collector, what, self.endpoint.host, self.endpoint.port
        )
    }
}

/// Everything a collector reports besides measurements.
pub trait Diagnostics: Send + Sync {
    /// The control loop is about to run the handler for `state`.
    fn state_changed(&self, collector: &str, state: CollectorState);

    /// A connection attempt failed and will be retried.
    fn connect_failed(&self, failure: &ConnectFailure<'_>);

    /// The connection opened but yielded no usable session.
    fn session_unavailable(&self, collector: &str, endpoint: &Endpoint);

    /// A managed entry could not be resolved and was skipped for this pass.
    fn entry_skipped(&self, collector: &str, entry: &ManagedEntry, error: &LookupError);

    /// One attribute was skipped for this pass.
    fn attribute_skipped(
        &self,
        collector: &str,
        entry: &ManagedEntry,
        attribute: &ManagedAttribute,
        reason: &SkipReason,
    );

    /// The session failed mid-pass; the collector will reconnect.
    fn session_lost(&self, collector: &str, error: &SessionError);

    /// A pass over the catalogue finished.
    fn pass_completed(&self, collector: &str, summary: &PassSummary, elapsed: Duration);
}

/// Logs diagnostics and emits connection failures as events.
pub struct Reporter {
    metadata: PluginMetadata,
    host: String,
    events: Arc<dyn EventSink>,
}

impl Reporter {
    /// Create a reporter titling events after `metadata` and stamping them
    /// with the local `host` name.
    pub fn new(metadata: PluginMetadata, host: impl Into<String>, events: Arc<dyn EventSink>) -> Self {
        Self {
            metadata,
            host: host.into(),
            events,
        }
    }

    fn emit(&self, severity: Severity, source: &str, message: String) {
        let event = Event::builder()
            .title(self.metadata.event_title())
            .source(source)
            .host(&self.host)
            .severity(severity)
            .message(message)
            .build();
        self.events.emit(event);
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("metadata", &self.metadata)
            .field("host", &self.host)
            .finish()
    }
}

impl Diagnostics for Reporter {
    fn state_changed(&self, collector: &str, state: CollectorState) {
        info!("Collector {} state is {}", collector, state);
    }

    fn connect_failed(&self, failure: &ConnectFailure<'_>) {
        let message = failure.message();
        error!(collector = %failure.collector, error = %failure.error, "{}", message);
        self.emit(Severity::Error, failure.source, message);
    }

    fn session_unavailable(&self, collector: &str, endpoint: &Endpoint) {
        error!(
            "Collector: {}, management session is unavailable for {}:{}",
            collector, endpoint.host, endpoint.port
        );
    }

    fn entry_skipped(&self, collector: &str, entry: &ManagedEntry, err: &LookupError) {
        error!(collector = %collector, "{} for object {}", err, entry.object_name);
    }

    fn attribute_skipped(
        &self,
        collector: &str,
        entry: &ManagedEntry,
        attribute: &ManagedAttribute,
        reason: &SkipReason,
    ) {
        match reason.severity() {
            Severity::Error => error!(
                collector = %collector,
                "{} while getting attribute {} from {}",
                reason, attribute.attribute, entry.object_name
            ),
            _ => warn!(
                collector = %collector,
                "{} while getting attribute {} ({}) from {}",
                reason, attribute.attribute, attribute.data_type, entry.object_name
            ),
        }
    }

    fn session_lost(&self, collector: &str, err: &SessionError) {
        warn!("Collector {}, {}", collector, err);
    }

    fn pass_completed(&self, collector: &str, summary: &PassSummary, elapsed: Duration) {
        debug!(
            collector = %collector,
            emitted = summary.emitted,
            skipped_attributes = summary.skipped_attributes,
            skipped_entries = summary.skipped_entries,
            "Pass completed in {:?}",
            elapsed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Output, Record};

    fn endpoint() -> Endpoint {
        Endpoint {
            host: "db01".into(),
            port: 9999,
            credentials: None,
        }
    }

    #[test]
    fn failure_messages_name_collector_host_and_port() {
        let endpoint = endpoint();
        let cases = [
            (ConnectError::UnknownHost("db01".into()), "Collector jvm, Unknown host db01, port 9999"),
            (ConnectError::NoRoute("db01".into()), "Collector jvm, No route to host db01, port 9999"),
            (
                ConnectError::Io("refused".into()),
                "Collector jvm, Failed to connect to management endpoint at host db01, port 9999",
            ),
        ];

        for (error, expected) in cases {
            let failure = ConnectFailure {
                collector: "jvm",
                source: "app-01",
                endpoint: &endpoint,
                error: &error,
            };
            assert_eq!(failure.message(), expected);
        }
    }

    #[test]
    fn connect_failure_becomes_error_event() {
        let (output, mut rx) = Output::channel();
        let reporter = Reporter::new(
            PluginMetadata::new("beanwatch", "1.0.0"),
            "collector-host",
            Arc::new(output),
        );

        let endpoint = endpoint();
        let error = ConnectError::UnknownHost("db01".into());
        reporter.connect_failed(&ConnectFailure {
            collector: "jvm",
            source: "app-01",
            endpoint: &endpoint,
            error: &error,
        });

        let Ok(Record::Event(event)) = rx.try_recv() else {
            panic!("expected an event");
        };
        assert_eq!(event.severity, Severity::Error);
        assert_eq!(event.title, "Plugin beanwatch version 1.0.0");
        assert_eq!(event.source, "app-01");
        assert_eq!(event.host, "collector-host");
        assert_eq!(event.message, "Collector jvm, Unknown host db01, port 9999");
    }

    #[test]
    fn skips_and_session_loss_emit_no_events() {
        let (output, mut rx) = Output::channel();
        let reporter = Reporter::new(PluginMetadata::default(), "h", Arc::new(output));
        let entry = ManagedEntry::new("java.lang:type=Memory");
        let attr = ManagedAttribute::new("HeapMemoryUsage", "HEAP", "composite:used");

        reporter.entry_skipped("jvm", &entry, &LookupError::InstanceNotFound("x".into()));
        reporter.attribute_skipped("jvm", &entry, &attr, &SkipReason::AttributeNotFound);
        reporter.session_lost("jvm", &SessionError("reset".into()));
        reporter.session_unavailable("jvm", &endpoint());

        assert!(rx.try_recv().is_err());
    }
}
