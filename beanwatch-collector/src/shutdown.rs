//! Cancellation of running collectors.

use std::time::Duration;

use tokio::sync::watch;

/// Owner side of the cancellation signal.
///
/// Call `trigger()` to stop every collector holding a signal derived from
/// this handle. Dropping the handle has the same effect.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a handle and a first signal.
    pub fn new() -> (Self, ShutdownSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, ShutdownSignal { rx })
    }

    /// Another signal observing this handle.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask all observers to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observer side of the cancellation signal.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

/// How a timed wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Shutdown,
}

impl ShutdownSignal {
    /// Whether cancellation has been requested.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once cancellation is requested.
    pub async fn triggered(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // Handle dropped
                return;
            }
        }
    }

    /// Sleep for `duration` unless cancelled first.
    pub async fn sleep(&mut self, duration: Duration) -> Wake {
        tokio::select! {
            biased;
            _ = self.triggered() => Wake::Shutdown,
            _ = tokio::time::sleep(duration) => Wake::Elapsed,
        }
    }
}
