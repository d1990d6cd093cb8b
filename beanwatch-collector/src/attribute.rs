//! Sampling of managed attributes into measurements.

use std::fmt;
use std::sync::Arc;

use beanwatch_types::{ManagedAttribute, ManagedEntry, Measurement, Severity};

use crate::{
    AttributeValueExtractor, Diagnostics, ExtractError, LookupError, ManagementSession,
    MeasurementSink, ObjectInstance, ReadError, SessionError,
};

/// Why one attribute produced no measurement in a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Protocol-level failure reported by the remote side.
    Remote(ReadError),

    /// The object has no such attribute.
    AttributeNotFound,

    /// The raw value could not be converted to a number.
    Extraction(ExtractError),
}

impl SkipReason {
    /// Severity the skip is logged at.
    pub fn severity(&self) -> Severity {
        match self {
            SkipReason::Remote(_) => Severity::Error,
            SkipReason::AttributeNotFound | SkipReason::Extraction(_) => Severity::Warn,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Remote(err) => write!(f, "{}", err),
            SkipReason::AttributeNotFound => f.write_str("Attribute not found"),
            SkipReason::Extraction(err) => write!(f, "Unusable value ({})", err),
        }
    }
}

/// Outcome of a failed attribute read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadFailure {
    /// Skip this attribute and carry on.
    Skip(SkipReason),

    /// The instance vanished; skip the rest of its entry.
    InstanceGone(LookupError),

    /// The session is unusable; end the pass.
    Disconnected(SessionError),
}

impl From<ReadError> for ReadFailure {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Io(msg) => ReadFailure::Disconnected(SessionError(msg)),
            ReadError::AttributeNotFound(_) => ReadFailure::Skip(SkipReason::AttributeNotFound),
            ReadError::InstanceNotFound(name) => {
                ReadFailure::InstanceGone(LookupError::InstanceNotFound(name))
            }
            other => ReadFailure::Skip(SkipReason::Remote(other)),
        }
    }
}

impl From<ExtractError> for ReadFailure {
    fn from(err: ExtractError) -> Self {
        ReadFailure::Skip(SkipReason::Extraction(err))
    }
}

/// Counts for one pass over the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub emitted: usize,
    pub skipped_attributes: usize,
    pub skipped_entries: usize,
}

/// Reads the enabled attributes of managed entries and emits measurements.
#[derive(Clone)]
pub struct AttributeCollector {
    collector: String,
    source: String,
    extractor: Arc<dyn AttributeValueExtractor>,
    measurements: Arc<dyn MeasurementSink>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl AttributeCollector {
    pub fn new(
        collector: impl Into<String>,
        source: impl Into<String>,
        extractor: Arc<dyn AttributeValueExtractor>,
        measurements: Arc<dyn MeasurementSink>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            collector: collector.into(),
            source: source.into(),
            extractor,
            measurements,
            diagnostics,
        }
    }

    /// Sample every enabled entry of `catalogue` once.
    ///
    /// Only a session failure ends the pass early.
    pub async fn collect_pass(
        &self,
        session: &dyn ManagementSession,
        catalogue: &[ManagedEntry],
    ) -> Result<PassSummary, SessionError> {
        let mut summary = PassSummary::default();
        for entry in catalogue.iter().filter(|e| e.enabled) {
            self.collect_entry(session, entry, &mut summary).await?;
        }
        Ok(summary)
    }

    /// Sample the enabled attributes of one entry.
    pub async fn collect_entry(
        &self,
        session: &dyn ManagementSession,
        entry: &ManagedEntry,
        summary: &mut PassSummary,
    ) -> Result<(), SessionError> {
        let instance = match session.object_instance(&entry.object_name).await {
            Ok(instance) => instance,
            Err(LookupError::Io(msg)) => return Err(SessionError(msg)),
            Err(err) => {
                self.diagnostics.entry_skipped(&self.collector, entry, &err);
                summary.skipped_entries += 1;
                return Ok(());
            }
        };

        for attribute in entry.enabled_attributes() {
            match self.try_read_attribute(session, &instance, attribute).await {
                Ok(measurement) => {
                    self.measurements.send(measurement);
                    summary.emitted += 1;
                }
                Err(ReadFailure::Skip(reason)) => {
                    self.diagnostics
                        .attribute_skipped(&self.collector, entry, attribute, &reason);
                    summary.skipped_attributes += 1;
                }
                Err(ReadFailure::InstanceGone(err)) => {
                    self.diagnostics.entry_skipped(&self.collector, entry, &err);
                    summary.skipped_entries += 1;
                    return Ok(());
                }
                Err(ReadFailure::Disconnected(err)) => return Err(err),
            }
        }
        Ok(())
    }

    /// Read and convert one attribute.
    pub async fn try_read_attribute(
        &self,
        session: &dyn ManagementSession,
        instance: &ObjectInstance,
        attribute: &ManagedAttribute,
    ) -> Result<Measurement, ReadFailure> {
        let raw = session
            .read_attribute(instance, &attribute.attribute)
            .await?;
        let value = self.extractor.extract(&raw, attribute)?;

        Ok(Measurement::new(
            attribute.metric_name.clone(),
            self.source.clone(),
            value,
        ))
    }
}

impl fmt::Debug for AttributeCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeCollector")
            .field("collector", &self.collector)
            .field("source", &self.source)
            .finish()
    }
}
