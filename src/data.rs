//! Command descriptors: the records cmdex indexes and returns.
//!
//! A [`Descriptor`] is owned by the caller. The index never mutates one; it
//! only reads a snapshot of them at build time and hands back references to
//! the very same instances at search time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar metadata value attached to a descriptor.
///
/// The [`Display`](fmt::Display) output is the canonical string form. Both the
/// document mapper and the `metadata` filter constructors go through it, so
/// exact-match comparison of metadata is comparison of these strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl MetadataValue {
    /// Returns the string value if this is a String variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an Integer variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value if this is a Float variant.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Bool variant.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            MetadataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetadataValue::Null)
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Null => f.write_str("null"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            // Shortest round-trip form: 2.0 -> "2", 2.5 -> "2.5".
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::String(s) => f.write_str(s),
        }
    }
}

// --- Conversions ---

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        MetadataValue::String(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        MetadataValue::String(v.to_string())
    }
}

impl From<&String> for MetadataValue {
    fn from(v: &String) -> Self {
        MetadataValue::String(v.clone())
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        MetadataValue::Integer(v)
    }
}

impl From<i32> for MetadataValue {
    fn from(v: i32) -> Self {
        MetadataValue::Integer(v as i64)
    }
}

impl From<u32> for MetadataValue {
    fn from(v: u32) -> Self {
        MetadataValue::Integer(v as i64)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        MetadataValue::Bool(v)
    }
}

impl<T: Into<MetadataValue>> From<Option<T>> for MetadataValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(MetadataValue::Null, Into::into)
    }
}

/// A command descriptor.
///
/// Identified by its hierarchical path (`parents` followed by `name`), typed
/// by a free-form label, and annotated with tags and scalar metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Leaf name.
    pub name: String,

    /// Parent segments, outermost first.
    #[serde(default)]
    pub parents: Vec<String>,

    /// Type label, e.g. `http` or `cli`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Free-form tags. Order is irrelevant.
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Arbitrary scalar metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl Descriptor {
    /// Create a new descriptor with only a leaf name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the parent path segments.
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Set the type label.
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Add a single tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add several tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add a metadata entry, replacing any previous value for the key.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Check if the descriptor carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Get a metadata value.
    pub fn get_metadata(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    /// Path segments including the leaf name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.parents
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_canonical_form() {
        assert_eq!(MetadataValue::from("2.0.0").to_string(), "2.0.0");
        assert_eq!(MetadataValue::from(42i64).to_string(), "42");
        assert_eq!(MetadataValue::from(-7).to_string(), "-7");
        assert_eq!(MetadataValue::from(true).to_string(), "true");
        assert_eq!(MetadataValue::from(2.0).to_string(), "2");
        assert_eq!(MetadataValue::from(2.5).to_string(), "2.5");
        assert_eq!(MetadataValue::Null.to_string(), "null");
        assert_eq!(MetadataValue::from(None::<i64>), MetadataValue::Null);
    }

    #[test]
    fn test_metadata_accessors() {
        let value = MetadataValue::from(3i64);
        assert_eq!(value.as_integer(), Some(3));
        assert_eq!(value.as_str(), None);
        assert!(!value.is_null());
        assert_eq!(MetadataValue::from(false).as_boolean(), Some(false));
        assert_eq!(MetadataValue::from(0.5).as_float(), Some(0.5));
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = Descriptor::new("serve")
            .with_parents(["tools", "http"])
            .with_type("http")
            .with_tags(["server", "api"])
            .with_tag("api")
            .with_metadata("version", "2.0.0");

        assert_eq!(descriptor.tags.len(), 2);
        assert!(descriptor.has_tag("server"));
        assert_eq!(
            descriptor.segments().collect::<Vec<_>>(),
            vec!["tools", "http", "serve"]
        );
        assert_eq!(
            descriptor.get_metadata("version"),
            Some(&MetadataValue::from("2.0.0"))
        );
    }

    #[test]
    fn test_descriptor_deserialize() {
        let json = r#"{
            "name": "http-server",
            "parents": ["svc"],
            "type": "http",
            "tags": ["server", "api"],
            "metadata": {"version": "2.0.0", "port": 8080, "public": true, "weight": 1.5, "owner": null}
        }"#;
        let descriptor: Descriptor = serde_json::from_str(json).unwrap();

        assert_eq!(descriptor.kind, "http");
        assert_eq!(descriptor.metadata["port"], MetadataValue::Integer(8080));
        assert_eq!(descriptor.metadata["public"], MetadataValue::Bool(true));
        assert_eq!(descriptor.metadata["weight"], MetadataValue::Float(1.5));
        assert_eq!(descriptor.metadata["owner"], MetadataValue::Null);
    }

    #[test]
    fn test_descriptor_deserialize_defaults() {
        let descriptor: Descriptor = serde_json::from_str(r#"{"name": "bare"}"#).unwrap();
        assert!(descriptor.parents.is_empty());
        assert!(descriptor.kind.is_empty());
        assert!(descriptor.tags.is_empty());
        assert!(descriptor.metadata.is_empty());
    }
}
