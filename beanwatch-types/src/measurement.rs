//! Measurement - one numeric sample of a managed attribute.

/// A single numeric sample destined for a measurement sink.
///
/// Collectors leave `timestamp_ms` unset; the sink or whatever sits
/// downstream of it stamps the time of receipt.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Metric the value is reported under (e.g. `JVM_HEAP_USED`).
    pub metric_name: String,

    /// Source the sample is attributed to, usually a host name.
    pub source: String,

    /// The numeric value.
    pub value: f64,

    /// Unix timestamp in milliseconds, if already known.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub timestamp_ms: Option<u64>,
}

impl Measurement {
    /// Create an unstamped measurement.
    pub fn new(metric_name: impl Into<String>, source: impl Into<String>, value: f64) -> Self {
        Self {
            metric_name: metric_name.into(),
            source: source.into(),
            value,
            timestamp_ms: None,
        }
    }

    /// Attach a timestamp.
    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }
}
