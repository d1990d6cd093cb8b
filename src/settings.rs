//! Settings file loading.
//!
//! Settings come from a TOML/JSON/YAML file (format chosen by extension)
//! layered with `BEANWATCH_*` environment variables:
//!
//! ```toml
//! connect_retry_secs = 10
//!
//! [plugin]
//! name = "jvm-monitor"
//! version = "1.0.0"
//!
//! [[collectors]]
//! name = "app01"
//! host = "app01.internal"
//! port = 8778
//! user = "monitor"
//! password = "secret"
//! poll_interval = 5000
//!
//! [[entries]]
//! mbean = "java.lang:type=Threading"
//!
//! [[entries.attributes]]
//! attribute = "ThreadCount"
//! metric = "JVM_THREADS"
//! type = "int"
//! ```
//!
//! The catalogue may instead live in its own file, referenced by
//! `catalogue = "catalogue.json"` and holding a top-level `entries` list.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use beanwatch_collector::{CollectorConfig, ConfigError, DEFAULT_RETRY_DELAY};
use beanwatch_types::{ManagedEntry, PluginMetadata};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Default Jolokia agent port.
pub const DEFAULT_PORT: u16 = 8778;

/// Default poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub plugin: PluginMetadata,

    /// Delay between connection attempts, in seconds.
    #[serde(default = "default_retry_secs")]
    pub connect_retry_secs: u64,

    #[serde(default)]
    pub collectors: Vec<CollectorItem>,

    /// Inline catalogue.
    #[serde(default)]
    pub entries: Vec<ManagedEntry>,

    /// Separate catalogue file; takes precedence over `entries`.
    #[serde(default)]
    pub catalogue: Option<PathBuf>,
}

/// One configured endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorItem {
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Milliseconds between pass starts.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// Path of the Jolokia agent on the endpoint.
    #[serde(default)]
    pub base_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogueFile {
    entries: Vec<ManagedEntry>,
}

fn default_retry_secs() -> u64 {
    DEFAULT_RETRY_DELAY.as_secs()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl CollectorItem {
    pub fn to_config(&self) -> Result<CollectorConfig, ConfigError> {
        Ok(
            CollectorConfig::new(self.host.clone(), self.port, self.poll_interval)?
                .with_credentials(self.user.clone(), self.password.clone())
                .with_source(self.source.clone()),
        )
    }
}

impl Settings {
    /// Load and validate settings from `path` plus the environment.
    ///
    /// A relative `catalogue` path is resolved against the settings file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings: Settings = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("BEANWATCH").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read settings from {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        if let Some(catalogue) = settings.catalogue.take() {
            let resolved = match path.parent() {
                Some(dir) if catalogue.is_relative() => dir.join(catalogue),
                _ => catalogue,
            };
            settings.catalogue = Some(resolved);
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.collectors.is_empty() {
            bail!("No collectors configured");
        }
        if self.connect_retry_secs == 0 {
            bail!("connect_retry_secs must be greater than zero");
        }

        let mut names = HashSet::new();
        for item in &self.collectors {
            if !names.insert(item.name.as_str()) {
                bail!("Duplicate collector name '{}'", item.name);
            }
            item.to_config()
                .with_context(|| format!("Collector '{}'", item.name))?;
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.connect_retry_secs)
    }

    /// The entry catalogue, read from the catalogue file when one is set.
    pub fn load_catalogue(&self) -> Result<Vec<ManagedEntry>> {
        let Some(path) = &self.catalogue else {
            return Ok(self.entries.clone());
        };

        let file: CatalogueFile = Config::builder()
            .add_source(File::from(path.as_path()))
            .build()
            .with_context(|| format!("Failed to read catalogue from {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Invalid catalogue in {}", path.display()))?;
        Ok(file.entries)
    }

    /// Human-readable overview, printed by `--check`.
    pub fn summary(&self, catalogue: &[ManagedEntry]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", self.plugin.name, self.plugin.version);
        for item in &self.collectors {
            let _ = writeln!(
                out,
                "  collector {}: {}:{} every {}ms",
                item.name, item.host, item.port, item.poll_interval
            );
        }

        let enabled: Vec<_> = catalogue.iter().filter(|e| e.enabled).collect();
        let attributes: usize = enabled.iter().map(|e| e.enabled_attributes().count()).sum();
        let _ = writeln!(
            out,
            "  catalogue: {} entries ({} enabled), {} attributes",
            catalogue.len(),
            enabled.len(),
            attributes
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const BASIC: &str = r#"
[plugin]
name = "jvm-monitor"
version = "2.0.0"

[[collectors]]
name = "app01"
host = "app01.internal"
user = "monitor"
password = "secret"
poll_interval = 2000

[[collectors]]
name = "app02"
host = "app02.internal"
port = 9999
source = "payments"

[[entries]]
mbean = "java.lang:type=Threading"

[[entries.attributes]]
attribute = "ThreadCount"
metric = "JVM_THREADS"
type = "int"

[[entries.attributes]]
attribute = "DaemonThreadCount"
metric = "JVM_DAEMON_THREADS"
type = "int"
enabled = false

[[entries]]
mbean = "java.lang:type=Memory"
enabled = false
"#;

    #[test]
    fn test_load_basic() {
        let file = write_file(".toml", BASIC);
        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.plugin, PluginMetadata::new("jvm-monitor", "2.0.0"));
        assert_eq!(settings.retry_delay(), Duration::from_secs(10));
        assert_eq!(settings.collectors.len(), 2);

        let first = &settings.collectors[0];
        assert_eq!(first.port, DEFAULT_PORT);
        assert_eq!(first.poll_interval, 2000);
        let config = first.to_config().unwrap();
        assert!(config.endpoint().credentials.is_some());
        assert_eq!(config.source(), None);

        let second = &settings.collectors[1];
        assert_eq!(second.port, 9999);
        assert_eq!(second.poll_interval, DEFAULT_POLL_INTERVAL_MS);
        assert!(second.to_config().unwrap().endpoint().credentials.is_none());

        let catalogue = settings.load_catalogue().unwrap();
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue[0].object_name, "java.lang:type=Threading");
        assert_eq!(catalogue[0].attributes[0].metric_name, "JVM_THREADS");
        assert_eq!(catalogue[0].attributes[0].data_type, "int");
        assert!(!catalogue[0].attributes[1].enabled);
        assert!(!catalogue[1].enabled);
    }

    #[test]
    fn test_plugin_defaults() {
        let file = write_file(
            ".toml",
            r#"
[[collectors]]
name = "app01"
host = "localhost"
"#,
        );
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.plugin, PluginMetadata::default());
        assert!(settings.load_catalogue().unwrap().is_empty());
    }

    #[test]
    fn test_separate_catalogue_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("catalogue.json"),
            r#"{"entries":[{"mbean":"java.lang:type=ClassLoading","attributes":[
                {"attribute":"LoadedClassCount","metric":"JVM_CLASSES","type":"int"}]}]}"#,
        )
        .unwrap();
        let settings_path = dir.path().join("beanwatch.toml");
        std::fs::write(
            &settings_path,
            r#"
catalogue = "catalogue.json"

[[collectors]]
name = "app01"
host = "localhost"
"#,
        )
        .unwrap();

        let settings = Settings::load(&settings_path).unwrap();
        assert_eq!(settings.catalogue, Some(dir.path().join("catalogue.json")));

        let catalogue = settings.load_catalogue().unwrap();
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue[0].attributes[0].attribute, "LoadedClassCount");
    }

    #[test]
    fn test_rejects_missing_collectors() {
        let file = write_file(".toml", "connect_retry_secs = 5\n");
        let err = Settings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("No collectors"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let file = write_file(
            ".toml",
            r#"
[[collectors]]
name = "app"
host = "a"

[[collectors]]
name = "app"
host = "b"
"#,
        );
        let err = Settings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Duplicate collector name 'app'"));
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let file = write_file(
            ".toml",
            r#"
[[collectors]]
name = "app"
host = "a"
poll_interval = 0
"#,
        );
        let err = Settings::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Collector 'app'"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_summary() {
        let file = write_file(".toml", BASIC);
        let settings = Settings::load(file.path()).unwrap();
        let catalogue = settings.load_catalogue().unwrap();

        let summary = settings.summary(&catalogue);
        assert!(summary.starts_with("jvm-monitor 2.0.0\n"));
        assert!(summary.contains("collector app01: app01.internal:8778 every 2000ms"));
        assert!(summary.contains("catalogue: 2 entries (1 enabled), 1 attributes"));
    }
}
