//! The management client seam.
//!
//! A [`ManagementClient`] opens and closes sessions against one endpoint.
//! While connected it hands out a [`SessionHandle`] through which managed
//! object instances are resolved and their attributes read.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{ConnectError, Endpoint, LookupError, ReadError};

/// A resolved managed object instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectInstance {
    /// Canonical name of the instance as reported by the endpoint.
    pub name: String,
}

impl ObjectInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A live session to a managed endpoint.
#[async_trait]
pub trait ManagementSession: Send + Sync {
    /// Resolve the instance registered under `object_name`.
    async fn object_instance(&self, object_name: &str) -> Result<ObjectInstance, LookupError>;

    /// Read the raw value of `attribute` from `instance`.
    async fn read_attribute(
        &self,
        instance: &ObjectInstance,
        attribute: &str,
    ) -> Result<Value, ReadError>;
}

/// Shared handle to the active session.
pub type SessionHandle = Arc<dyn ManagementSession>;

/// Opens and closes sessions to a managed endpoint.
#[async_trait]
pub trait ManagementClient: Send {
    /// Open a session to `endpoint`.
    async fn connect(&mut self, endpoint: &Endpoint) -> Result<(), ConnectError>;

    /// The session opened by the last successful `connect`.
    ///
    /// `None` means the connection is unusable even though `connect`
    /// reported success.
    fn session(&self) -> Option<SessionHandle>;

    /// Release the session and any partially opened resources.
    async fn disconnect(&mut self);
}
