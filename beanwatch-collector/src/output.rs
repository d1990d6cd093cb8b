//! Sinks for measurements and events, and the built-in output backends.

use std::io::Write;

use beanwatch_types::{Event, Measurement};
use tokio::sync::mpsc;

/// Accepts measurements, one at a time.
///
/// Implementations must tolerate concurrent calls from independent collectors.
pub trait MeasurementSink: Send + Sync {
    fn send(&self, measurement: Measurement);
}

/// Accepts events, one at a time.
///
/// Implementations must tolerate concurrent calls from independent collectors.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Anything an [`Output`] forwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Measurement(Measurement),
    Event(Event),
}

/// Output destination for measurements and events.
#[derive(Debug, Clone)]
pub enum Output {
    /// Write records to stdout using the plugin line protocol.
    ///
    /// Measurements are written as `METRIC VALUE SOURCE [TIMESTAMP]`, events as
    /// `_bevent:TITLE|m:MESSAGE|h:HOST|s:SOURCE|t:SEVERITY`.
    Stdout,

    /// Send records through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    Channel(mpsc::UnboundedSender<Record>),
}

impl Output {
    /// Create a stdout output.
    pub fn stdout() -> Self {
        Output::Stdout
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use beanwatch_collector::{MeasurementSink, Output, Record};
    /// use beanwatch_types::Measurement;
    ///
    /// let (output, mut rx) = Output::channel();
    /// output.send(Measurement::new("JVM_THREADS", "app-01", 12.0));
    ///
    /// assert!(matches!(rx.try_recv(), Ok(Record::Measurement(_))));
    /// ```
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Record>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Output::Channel(tx), rx)
    }

    /// Render a measurement in the plugin line protocol.
    pub fn format_measurement(measurement: &Measurement) -> String {
        let mut line = format!(
            "{} {} {}",
            measurement.metric_name, measurement.value, measurement.source
        );
        if let Some(ts) = measurement.timestamp_ms {
            line.push_str(&format!(" {}", ts / 1000));
        }
        line
    }

    /// Render an event in the plugin line protocol.
    pub fn format_event(event: &Event) -> String {
        format!(
            "_bevent:{}|m:{}|h:{}|s:{}|t:{}",
            escape(&event.title),
            escape(&event.message),
            escape(&event.host),
            escape(&event.source),
            event.severity
        )
    }

    fn forward(&self, record: Record) {
        match self {
            Output::Stdout => {
                let line = match &record {
                    Record::Measurement(m) => Self::format_measurement(m),
                    Record::Event(e) => Self::format_event(e),
                };
                // Best effort: a closed stdout must not take the collector down
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{}", line);
                let _ = out.flush();
            }
            Output::Channel(tx) => {
                // Receiver gone means nobody is listening any more
                let _ = tx.send(record);
            }
        }
    }
}

impl MeasurementSink for Output {
    fn send(&self, measurement: Measurement) {
        self.forward(Record::Measurement(measurement));
    }
}

impl EventSink for Output {
    fn emit(&self, event: Event) {
        self.forward(Record::Event(event));
    }
}

// The event protocol is pipe-delimited
fn escape(field: &str) -> String {
    field.replace('|', "/").replace('\n', " ")
}
