//! Error types for the collector and its management clients.

use thiserror::Error;

/// Errors raised while opening a session to the managed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// The host name could not be resolved.
    #[error("Unknown host: {0}")]
    UnknownHost(String),

    /// The host resolved but is not reachable.
    #[error("No route to host: {0}")]
    NoRoute(String),

    /// Any other I/O failure while opening the session.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors raised while resolving a managed object instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The object identifier is not well formed.
    #[error("Malformed object name: {0}")]
    MalformedName(String),

    /// No instance is registered under the identifier.
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    /// The session failed underneath the lookup.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors raised while reading one attribute of a resolved instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The session failed underneath the read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The remote side could not reflect on the attribute getter.
    #[error("Reflection error: {0}")]
    Reflection(String),

    /// The attribute getter threw on the remote side.
    #[error("Managed bean error: {0}")]
    Bean(String),

    /// The attribute getter threw an unchecked exception on the remote side.
    #[error("Runtime managed bean error: {0}")]
    RuntimeBean(String),

    /// The remote failure could not be decoded.
    #[error("Malformed remote error: {0}")]
    MalformedRemote(String),

    /// The object has no such attribute.
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    /// The instance disappeared between lookup and read.
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),
}

/// Errors raised when converting a raw attribute value to a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("value is absent")]
    Absent,

    #[error("invalid key '{0}'")]
    InvalidKey(String),

    #[error("cannot convert '{0}' to a number")]
    NotNumeric(String),

    #[error("unsupported data type '{0}'")]
    Unsupported(String),
}

/// The session is no longer usable; the collector must reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Session lost: {0}")]
pub struct SessionError(pub String);

/// Invalid collector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("poll interval must be a positive number of milliseconds")]
    InvalidPollInterval,
}

#[cfg(feature = "jolokia")]
impl From<reqwest::Error> for ConnectError {
    fn from(err: reqwest::Error) -> Self {
        use std::error::Error as _;

        let mut source = err.source();
        while let Some(cause) = source {
            if let Some(io) = cause.downcast_ref::<std::io::Error>() {
                if matches!(
                    io.kind(),
                    std::io::ErrorKind::HostUnreachable | std::io::ErrorKind::NetworkUnreachable
                ) {
                    return ConnectError::NoRoute(err.to_string());
                }
            }
            source = cause.source();
        }
        ConnectError::Io(err.to_string())
    }
}

#[cfg(feature = "jolokia")]
impl From<reqwest::Error> for ReadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ReadError::MalformedRemote(err.to_string())
        } else {
            ReadError::Io(err.to_string())
        }
    }
}

#[cfg(feature = "jolokia")]
impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Io(err.to_string())
    }
}
