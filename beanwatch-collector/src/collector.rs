//! The collector state machine.
//!
//! A [`Collector`] owns one management client and walks it through
//! `Initializing → Connecting → Connected → Collecting`, falling back to
//! `Disconnected → Connecting` whenever the session fails mid-pass, until
//! cancellation moves it to `Terminated` and finally `Exit`.

use std::sync::Arc;
use std::time::Duration;

use beanwatch_types::{ManagedEntry, PluginMetadata};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::connection::DEFAULT_RETRY_DELAY;
use crate::{
    local_hostname, AttributeCollector, AttributeValueExtractor, CollectorConfig, CollectorState,
    ConnectionManager, Diagnostics, ManagementClient, MeasurementSink, NumericExtractor, Output,
    PollScheduler, Reporter, SessionHandle, ShutdownSignal, Wake,
};

/// Samples the catalogue of one endpoint until cancelled.
///
/// # Example
///
/// ```rust,ignore
/// use beanwatch_collector::{Collector, CollectorConfig, Shutdown};
///
/// let config = CollectorConfig::new("localhost", 8778, 5000)?;
/// let (shutdown, signal) = Shutdown::new();
///
/// let collector = Collector::builder("jvm", config, client)
///     .catalogue(catalogue)
///     .build(signal);
///
/// let task = tokio::spawn(collector.run());
/// // ...
/// shutdown.trigger();
/// task.await?;
/// ```
pub struct Collector<C> {
    name: String,
    config: CollectorConfig,
    catalogue: Arc<Vec<ManagedEntry>>,
    connection: ConnectionManager<C>,
    scheduler: PollScheduler,
    extractor: Arc<dyn AttributeValueExtractor>,
    measurements: Arc<dyn MeasurementSink>,
    diagnostics: Arc<dyn Diagnostics>,
    hostname: String,
    shutdown: ShutdownSignal,

    state: CollectorState,
    session: Option<SessionHandle>,
    source: String,
}

impl<C: ManagementClient> Collector<C> {
    /// Create a builder for a collector named `name`.
    pub fn builder(name: impl Into<String>, config: CollectorConfig, client: C) -> CollectorBuilder<C> {
        CollectorBuilder::new(name.into(), config, client)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    /// The effective source; empty until `Initializing` has run.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether a session is currently held.
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Run the control loop until the collector exits.
    pub async fn run(mut self) {
        while self.state != CollectorState::Exit {
            self.step().await;
        }
        info!("Collector {} complete", self.name);
    }

    /// Run the handler for the current state and move to the state it returns.
    pub async fn step(&mut self) -> CollectorState {
        if self.state == CollectorState::Exit {
            return self.state;
        }

        self.diagnostics.state_changed(&self.name, self.state);
        let next = match self.state {
            CollectorState::Initializing => self.state_initializing(),
            CollectorState::Connecting => self.state_connecting().await,
            CollectorState::Connected => self.state_connected(),
            CollectorState::Collecting => self.state_collecting().await,
            CollectorState::Disconnected => self.state_disconnected().await,
            CollectorState::Terminated => self.state_terminated(),
            CollectorState::Exit => CollectorState::Exit,
        };
        self.state = next;
        debug_assert_eq!(self.session.is_some(), self.state.holds_session());
        next
    }

    fn state_initializing(&mut self) -> CollectorState {
        self.source = match self.config.source() {
            Some(source) => source.to_string(),
            None => self.hostname.clone(),
        };
        CollectorState::Connecting
    }

    async fn state_connecting(&mut self) -> CollectorState {
        match self
            .connection
            .connect(
                &self.name,
                &self.source,
                self.diagnostics.as_ref(),
                &mut self.shutdown,
            )
            .await
        {
            Ok(session) => {
                self.session = Some(session);
                CollectorState::Connected
            }
            Err(_) => {
                info!("Collector {} cancelled while connecting", self.name);
                CollectorState::Terminated
            }
        }
    }

    fn state_connected(&mut self) -> CollectorState {
        CollectorState::Collecting
    }

    async fn state_collecting(&mut self) -> CollectorState {
        let Some(session) = self.session.clone() else {
            return CollectorState::Disconnected;
        };
        let sampler = AttributeCollector::new(
            self.name.clone(),
            self.source.clone(),
            self.extractor.clone(),
            self.measurements.clone(),
            self.diagnostics.clone(),
        );

        loop {
            if self.shutdown.is_triggered() {
                info!("Collector {} interrupted", self.name);
                self.release().await;
                return CollectorState::Terminated;
            }

            let started = Instant::now();
            match sampler.collect_pass(session.as_ref(), &self.catalogue).await {
                Ok(summary) => {
                    self.diagnostics
                        .pass_completed(&self.name, &summary, started.elapsed());
                }
                Err(err) => {
                    self.diagnostics.session_lost(&self.name, &err);
                    self.session = None;
                    return CollectorState::Disconnected;
                }
            }

            if self.scheduler.wait_next(started, &mut self.shutdown).await == Wake::Shutdown {
                info!("Collector {} interrupted", self.name);
                self.release().await;
                return CollectorState::Terminated;
            }
        }
    }

    async fn state_disconnected(&mut self) -> CollectorState {
        self.connection.disconnect().await;
        CollectorState::Connecting
    }

    fn state_terminated(&mut self) -> CollectorState {
        CollectorState::Exit
    }

    async fn release(&mut self) {
        if self.session.take().is_some() {
            debug!("Collector {} releasing session", self.name);
            self.connection.disconnect().await;
        }
    }
}

impl<C> std::fmt::Debug for Collector<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("source", &self.source)
            .field("connected", &self.session.is_some())
            .finish()
    }
}

/// Builder for [`Collector`].
pub struct CollectorBuilder<C> {
    name: String,
    config: CollectorConfig,
    client: C,
    catalogue: Arc<Vec<ManagedEntry>>,
    extractor: Option<Arc<dyn AttributeValueExtractor>>,
    measurements: Option<Arc<dyn MeasurementSink>>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
    hostname: Option<String>,
    retry_delay: Option<Duration>,
}

impl<C: ManagementClient> CollectorBuilder<C> {
    fn new(name: String, config: CollectorConfig, client: C) -> Self {
        Self {
            name,
            config,
            client,
            catalogue: Arc::new(Vec::new()),
            extractor: None,
            measurements: None,
            diagnostics: None,
            hostname: None,
            retry_delay: None,
        }
    }

    /// Set the entries sampled every pass.
    pub fn catalogue(mut self, catalogue: Arc<Vec<ManagedEntry>>) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Set the value extractor (default: [`NumericExtractor`]).
    pub fn extractor(mut self, extractor: Arc<dyn AttributeValueExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the measurement sink (default: stdout).
    pub fn measurements(mut self, sink: Arc<dyn MeasurementSink>) -> Self {
        self.measurements = Some(sink);
        self
    }

    /// Set the diagnostics (default: a [`Reporter`] emitting events to stdout).
    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Set the local host name used when no source is configured.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the delay between connection attempts (default: 10 seconds).
    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }

    /// Build the collector; it stops once `shutdown` fires.
    pub fn build(self, shutdown: ShutdownSignal) -> Collector<C> {
        let hostname = self.hostname.unwrap_or_else(local_hostname);
        let diagnostics = self.diagnostics.unwrap_or_else(|| {
            Arc::new(Reporter::new(
                PluginMetadata::default(),
                hostname.clone(),
                Arc::new(Output::stdout()),
            ))
        });
        let connection = ConnectionManager::new(self.client, self.config.endpoint().clone())
            .with_retry_delay(self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY));

        Collector {
            name: self.name,
            scheduler: PollScheduler::new(self.config.poll_interval()),
            config: self.config,
            catalogue: self.catalogue,
            connection,
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(NumericExtractor::new())),
            measurements: self
                .measurements
                .unwrap_or_else(|| Arc::new(Output::stdout())),
            diagnostics,
            hostname,
            shutdown,
            state: CollectorState::Initializing,
            session: None,
            source: String::new(),
        }
    }
}
