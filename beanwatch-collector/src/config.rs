//! Collector configuration.

use std::fmt;
use std::time::Duration;

use crate::ConfigError;

/// User name and password for an authenticated endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Where a management client connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub credentials: Option<Credentials>,
}

/// Immutable configuration of one collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    endpoint: Endpoint,
    source: Option<String>,
    poll_interval: Duration,
}

impl CollectorConfig {
    /// Create a configuration for `host:port` sampling every `poll_interval_ms`.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        poll_interval_ms: u64,
    ) -> Result<Self, ConfigError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }

        Ok(Self {
            endpoint: Endpoint {
                host,
                port,
                credentials: None,
            },
            source: None,
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }

    /// Authenticate with `user`/`password`.
    ///
    /// Credentials are only used when both halves are present.
    pub fn with_credentials(mut self, user: Option<String>, password: Option<String>) -> Self {
        self.endpoint.credentials = match (user, password) {
            (Some(user), Some(password)) => Some(Credentials { user, password }),
            _ => None,
        };
        self
    }

    /// Report measurements under `source`. An empty value counts as unset.
    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn host(&self) -> &str {
        &self.endpoint.host
    }

    pub fn port(&self) -> u16 {
        self.endpoint.port
    }

    /// The configured source, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_interval() {
        assert_eq!(
            CollectorConfig::new("localhost", 9999, 0),
            Err(ConfigError::InvalidPollInterval)
        );
    }

    #[test]
    fn rejects_blank_host() {
        assert_eq!(
            CollectorConfig::new("  ", 9999, 1000),
            Err(ConfigError::EmptyHost)
        );
    }

    #[test]
    fn credentials_need_both_halves() {
        let config = CollectorConfig::new("localhost", 9999, 1000)
            .unwrap()
            .with_credentials(Some("admin".into()), None);
        assert!(config.endpoint().credentials.is_none());

        let config = config.with_credentials(Some("admin".into()), Some("secret".into()));
        assert_eq!(
            config.endpoint().credentials,
            Some(Credentials::new("admin", "secret"))
        );
    }

    #[test]
    fn empty_source_counts_as_unset() {
        let config = CollectorConfig::new("localhost", 9999, 1000)
            .unwrap()
            .with_source(Some(String::new()));
        assert_eq!(config.source(), None);

        let config = config.with_source(Some("app-01".into()));
        assert_eq!(config.source(), Some("app-01"));
    }

    #[test]
    fn debug_hides_password() {
        let creds = Credentials::new("admin", "secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn poll_interval_in_millis() {
        let config = CollectorConfig::new("localhost", 9999, 5000).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(5000));
        assert_eq!(config.host(), "localhost");
        assert_eq!(config.port(), 9999);
    }
}
