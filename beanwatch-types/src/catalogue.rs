//! The catalogue of managed objects and the attributes sampled from them.

/// One addressable managed object and the attributes to sample from it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManagedEntry {
    /// Object identifier, e.g. `java.lang:type=Memory`.
    #[cfg_attr(feature = "serde", serde(alias = "mbean"))]
    pub object_name: String,

    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Vec<ManagedAttribute>,
}

impl ManagedEntry {
    /// Create an enabled entry with no attributes.
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            enabled: true,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn attribute(mut self, attribute: ManagedAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set whether the entry is sampled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enabled attributes, in catalogue order.
    pub fn enabled_attributes(&self) -> impl Iterator<Item = &ManagedAttribute> {
        self.attributes.iter().filter(|a| a.enabled)
    }
}

/// A named, typed attribute of a managed object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManagedAttribute {
    /// Attribute name on the remote object.
    pub attribute: String,

    /// Metric name the converted value is reported under.
    #[cfg_attr(feature = "serde", serde(alias = "metric"))]
    pub metric_name: String,

    /// Declared data type, interpreted by the value extractor.
    #[cfg_attr(feature = "serde", serde(alias = "type"))]
    pub data_type: String,

    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,
}

impl ManagedAttribute {
    /// Create an enabled attribute.
    pub fn new(
        attribute: impl Into<String>,
        metric_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            metric_name: metric_name.into(),
            data_type: data_type.into(),
            enabled: true,
        }
    }

    /// Set whether the attribute is sampled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[cfg(feature = "serde")]
fn enabled_by_default() -> bool {
    true
}
