//! Descriptive metadata of the running plugin.

/// Name and version of the plugin, used to title events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
}

impl PluginMetadata {
    /// Create plugin metadata.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Title used for every event this plugin emits.
    pub fn event_title(&self) -> String {
        format!("Plugin {} version {}", self.name, self.version)
    }
}

impl Default for PluginMetadata {
    fn default() -> Self {
        Self::new("beanwatch", env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_title_format() {
        let meta = PluginMetadata::new("jvm-monitor", "2.1.0");
        assert_eq!(meta.event_title(), "Plugin jvm-monitor version 2.1.0");
    }

    #[test]
    fn default_uses_crate_version() {
        let meta = PluginMetadata::default();
        assert_eq!(meta.name, "beanwatch");
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
    }
}
