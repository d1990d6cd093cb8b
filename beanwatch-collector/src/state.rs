//! Lifecycle states of a collector.

use std::fmt;

/// The state a collector is in.
///
/// The lifecycle flows:
/// - `Initializing` -> `Connecting` -> `Connected` -> `Collecting`
/// - `Collecting` -> `Disconnected` -> `Connecting` (session lost mid-pass)
/// - `Connecting` | `Collecting` -> `Terminated` -> `Exit` (cancellation)
///
/// A session is held exactly while the state is `Connected` or `Collecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorState {
    /// Resolving the effective source.
    Initializing,

    /// Opening a session, retrying until it succeeds or is cancelled.
    Connecting,

    /// Session established.
    Connected,

    /// Sampling the catalogue once per poll interval.
    Collecting,

    /// Session lost; it is released before reconnecting.
    Disconnected,

    /// Cancellation observed.
    Terminated,

    /// The control loop has stopped.
    Exit,
}

impl CollectorState {
    /// Upper-case name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectorState::Initializing => "INITIALIZING",
            CollectorState::Connecting => "CONNECTING",
            CollectorState::Connected => "CONNECTED",
            CollectorState::Collecting => "COLLECTING",
            CollectorState::Disconnected => "DISCONNECTED",
            CollectorState::Terminated => "TERMINATED",
            CollectorState::Exit => "EXIT",
        }
    }

    /// Whether a live session belongs to this state.
    pub fn holds_session(&self) -> bool {
        matches!(self, CollectorState::Connected | CollectorState::Collecting)
    }
}

impl fmt::Display for CollectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
