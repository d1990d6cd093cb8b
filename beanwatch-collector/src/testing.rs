//! Scripted management client and recording diagnostics for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use beanwatch_types::{Event, ManagedAttribute, ManagedEntry, Measurement};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    CollectorState, ConnectError, ConnectFailure, Diagnostics, Endpoint, LookupError,
    ManagementClient, ManagementSession, ObjectInstance, PassSummary, ReadError, Record,
    SessionError, SessionHandle, SkipReason,
};

#[derive(Default)]
pub(crate) struct FakeSession {
    objects: HashMap<String, HashMap<String, Result<Value, ReadError>>>,
    malformed: HashSet<String>,
    lookup_io_failure: HashSet<String>,
    io_failure_on_read: Option<usize>,
    read_delay: Duration,
    reads: AtomicUsize,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object<const N: usize>(mut self, name: &str, attributes: [(&str, Value); N]) -> Self {
        let object = self.objects.entry(name.to_string()).or_default();
        for (attribute, value) in attributes {
            object.insert(attribute.to_string(), Ok(value));
        }
        self
    }

    pub fn failing(mut self, name: &str, attribute: &str, error: ReadError) -> Self {
        self.objects
            .entry(name.to_string())
            .or_default()
            .insert(attribute.to_string(), Err(error));
        self
    }

    pub fn malformed(mut self, name: &str) -> Self {
        self.malformed.insert(name.to_string());
        self
    }

    /// Looking up `name` fails with an I/O error.
    pub fn lookup_io_failure(mut self, name: &str) -> Self {
        self.lookup_io_failure.insert(name.to_string());
        self
    }

    /// The `n`th read (1-based) fails with an I/O error.
    pub fn io_failure_on_read(mut self, n: usize) -> Self {
        self.io_failure_on_read = Some(n);
        self
    }

    /// Every read takes `delay` of (virtual) time.
    pub fn read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ManagementSession for FakeSession {
    async fn object_instance(&self, object_name: &str) -> Result<ObjectInstance, LookupError> {
        if self.lookup_io_failure.contains(object_name) {
            return Err(LookupError::Io("broken pipe".into()));
        }
        if self.malformed.contains(object_name) {
            return Err(LookupError::MalformedName(object_name.to_string()));
        }
        if self.objects.contains_key(object_name) {
            Ok(ObjectInstance::new(object_name))
        } else {
            Err(LookupError::InstanceNotFound(object_name.to_string()))
        }
    }

    async fn read_attribute(
        &self,
        instance: &ObjectInstance,
        attribute: &str,
    ) -> Result<Value, ReadError> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }
        if self.io_failure_on_read == Some(n) {
            return Err(ReadError::Io("connection reset".into()));
        }
        self.objects
            .get(&instance.name)
            .and_then(|attrs| attrs.get(attribute))
            .cloned()
            .unwrap_or_else(|| Err(ReadError::AttributeNotFound(attribute.to_string())))
    }
}

/// Counters shared between a `FakeClient` and the test that moved it away.
#[derive(Debug, Default)]
pub(crate) struct ClientStats {
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
}

impl ClientStats {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

/// What a scripted connect attempt does.
#[derive(Debug, Clone)]
pub(crate) enum Attempt {
    Fail(ConnectError),
    NoSession,
}

/// Plays back scripted attempts, then connects successfully.
pub(crate) struct FakeClient {
    script: VecDeque<Attempt>,
    fail_forever: bool,
    session: Arc<FakeSession>,
    connected: Option<SessionHandle>,
    stats: Arc<ClientStats>,
}

impl FakeClient {
    pub fn new(session: FakeSession) -> Self {
        Self {
            script: VecDeque::new(),
            fail_forever: false,
            session: Arc::new(session),
            connected: None,
            stats: Arc::default(),
        }
    }

    pub fn then(mut self, attempt: Attempt) -> Self {
        self.script.push_back(attempt);
        self
    }

    pub fn refusing(mut self, times: usize) -> Self {
        for _ in 0..times {
            self.script
                .push_back(Attempt::Fail(ConnectError::Io("connection refused".into())));
        }
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.fail_forever = true;
        self
    }

    pub fn stats(&self) -> Arc<ClientStats> {
        self.stats.clone()
    }

    pub fn session(&self) -> Arc<FakeSession> {
        self.session.clone()
    }
}

#[async_trait]
impl ManagementClient for FakeClient {
    async fn connect(&mut self, endpoint: &Endpoint) -> Result<(), ConnectError> {
        self.stats.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_forever {
            return Err(ConnectError::UnknownHost(endpoint.host.clone()));
        }
        match self.script.pop_front() {
            Some(Attempt::Fail(err)) => Err(err),
            Some(Attempt::NoSession) => {
                self.connected = None;
                Ok(())
            }
            None => {
                self.connected = Some(self.session.clone());
                Ok(())
            }
        }
    }

    fn session(&self) -> Option<SessionHandle> {
        self.connected.clone()
    }

    async fn disconnect(&mut self) {
        self.stats.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Diag {
    State(CollectorState),
    ConnectFailed(String),
    SessionUnavailable,
    EntrySkipped(LookupError),
    AttributeSkipped(String, SkipReason),
    SessionLost(SessionError),
    PassCompleted(PassSummary),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingDiagnostics {
    events: Mutex<Vec<Diag>>,
}

impl RecordingDiagnostics {
    fn push(&self, diag: Diag) {
        self.events.lock().unwrap().push(diag);
    }

    pub fn events(&self) -> Vec<Diag> {
        self.events.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<CollectorState> {
        self.events()
            .into_iter()
            .filter_map(|d| match d {
                Diag::State(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn connect_failures(&self) -> usize {
        self.events()
            .iter()
            .filter(|d| matches!(d, Diag::ConnectFailed(_)))
            .count()
    }

    pub fn passes(&self) -> usize {
        self.events()
            .iter()
            .filter(|d| matches!(d, Diag::PassCompleted(_)))
            .count()
    }

    pub fn entries_skipped(&self) -> Vec<LookupError> {
        self.events()
            .into_iter()
            .filter_map(|d| match d {
                Diag::EntrySkipped(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn attributes_skipped(&self) -> Vec<(String, SkipReason)> {
        self.events()
            .into_iter()
            .filter_map(|d| match d {
                Diag::AttributeSkipped(a, r) => Some((a, r)),
                _ => None,
            })
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn state_changed(&self, _collector: &str, state: CollectorState) {
        self.push(Diag::State(state));
    }

    fn connect_failed(&self, failure: &ConnectFailure<'_>) {
        self.push(Diag::ConnectFailed(failure.message()));
    }

    fn session_unavailable(&self, _collector: &str, _endpoint: &Endpoint) {
        self.push(Diag::SessionUnavailable);
    }

    fn entry_skipped(&self, _collector: &str, _entry: &ManagedEntry, error: &LookupError) {
        self.push(Diag::EntrySkipped(error.clone()));
    }

    fn attribute_skipped(
        &self,
        _collector: &str,
        _entry: &ManagedEntry,
        attribute: &ManagedAttribute,
        reason: &SkipReason,
    ) {
        self.push(Diag::AttributeSkipped(
            attribute.attribute.clone(),
            reason.clone(),
        ));
    }

    fn session_lost(&self, _collector: &str, error: &SessionError) {
        self.push(Diag::SessionLost(error.clone()));
    }

    fn pass_completed(&self, _collector: &str, summary: &PassSummary, _elapsed: Duration) {
        self.push(Diag::PassCompleted(*summary));
    }
}

pub(crate) fn drain_measurements(rx: &mut mpsc::UnboundedReceiver<Record>) -> Vec<Measurement> {
    let mut out = Vec::new();
    while let Ok(record) = rx.try_recv() {
        if let Record::Measurement(m) = record {
            out.push(m);
        }
    }
    out
}

pub(crate) fn drain_events(rx: &mut mpsc::UnboundedReceiver<Record>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(record) = rx.try_recv() {
        if let Record::Event(e) = record {
            out.push(e);
        }
    }
    out
}
