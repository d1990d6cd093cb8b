//! Session management with indefinite retry.

use std::time::Duration;

use crate::{
    ConnectFailure, Diagnostics, Endpoint, ManagementClient, SessionHandle, ShutdownSignal, Wake,
};

/// Fixed delay between connection attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Cancellation was observed while connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Owns the management client and the endpoint it connects to.
pub struct ConnectionManager<C> {
    client: C,
    endpoint: Endpoint,
    retry_delay: Duration,
}

impl<C: ManagementClient> ConnectionManager<C> {
    pub fn new(client: C, endpoint: Endpoint) -> Self {
        Self {
            client,
            endpoint,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Override the delay between attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Connect, retrying every `retry_delay` until a usable session is
    /// obtained or `shutdown` fires. A shutdown that is already pending
    /// cancels before the next attempt.
    ///
    /// Every failed attempt is reported through `diagnostics`; attempts that
    /// connect without yielding a session are released before retrying.
    pub async fn connect(
        &mut self,
        collector: &str,
        source: &str,
        diagnostics: &dyn Diagnostics,
        shutdown: &mut ShutdownSignal,
    ) -> Result<SessionHandle, Cancelled> {
        loop {
            if shutdown.is_triggered() {
                return Err(Cancelled);
            }

            match self.client.connect(&self.endpoint).await {
                Ok(()) => match self.client.session() {
                    Some(session) => return Ok(session),
                    None => {
                        diagnostics.session_unavailable(collector, &self.endpoint);
                        self.client.disconnect().await;
                    }
                },
                Err(error) => diagnostics.connect_failed(&ConnectFailure {
                    collector,
                    source,
                    endpoint: &self.endpoint,
                    error: &error,
                }),
            }

            if shutdown.sleep(self.retry_delay).await == Wake::Shutdown {
                return Err(Cancelled);
            }
        }
    }

    /// Release the current session.
    pub async fn disconnect(&mut self) {
        self.client.disconnect().await;
    }
}

impl<C> std::fmt::Debug for ConnectionManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("endpoint", &self.endpoint)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}
