//! The dynamic form object.
//!
//! A [`Record`] stands in for a model instance: an optional id, string attributes and named
//! associations. Blueprints load records from JSON, where ids and attribute values may be
//! strings, numbers or booleans.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A form object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Primary key. A record with an id is persisted.
    #[serde(deserialize_with = "scalar_id")]
    pub id: Option<String>,
    /// Attribute values by name.
    #[serde(deserialize_with = "scalar_map")]
    pub attributes: BTreeMap<String, String>,
    /// Child collections by association name.
    pub associations: BTreeMap<String, Association>,
    /// Whether the record is already flagged for destruction.
    pub marked_for_destruction: bool,
}

impl Record {
    /// A new, unsaved record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary key.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add an association.
    #[must_use]
    pub fn with_association(mut self, name: impl Into<String>, association: Association) -> Self {
        self.associations.insert(name.into(), association);
        self
    }

    /// Whether the record has been saved.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// An attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// An association by name.
    #[must_use]
    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }
}

/// A has-many association.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Association {
    /// Existing child records, in display order.
    pub records: Vec<Record>,
    /// Template for newly built children (default attribute values, nested associations).
    pub prototype: Record,
}

impl Association {
    /// An association whose new records start from `prototype`.
    #[must_use]
    pub fn new(prototype: Record) -> Self {
        Self {
            records: Vec::new(),
            prototype,
        }
    }

    /// Append an existing child record.
    #[must_use]
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    /// Build a new, unsaved child from the prototype.
    #[must_use]
    pub fn build(&self) -> Record {
        Record {
            id: None,
            marked_for_destruction: false,
            ..self.prototype.clone()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Flag(b) => b.to_string(),
        }
    }
}

fn scalar_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<Scalar>::deserialize(deserializer).map(|id| id.map(Scalar::into_string))
}

fn scalar_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    BTreeMap::<String, Option<Scalar>>::deserialize(deserializer).map(|map| {
        map.into_iter()
            .map(|(name, value)| (name, value.map(Scalar::into_string).unwrap_or_default()))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted() {
        assert!(!Record::new().is_persisted());
        assert!(Record::new().with_id("7").is_persisted());
    }

    #[test]
    fn test_build_clears_identity() {
        let prototype = Record::new()
            .with_id("1")
            .with_attribute("quantity", "1");
        let mut association = Association::new(prototype);
        association.prototype.marked_for_destruction = true;

        let built = association.build();
        assert!(!built.is_persisted());
        assert!(!built.marked_for_destruction);
        assert_eq!(built.attribute("quantity"), Some("1"));
    }

    #[test]
    fn test_deserialize_scalars() {
        let json = r#"{
            "id": 42,
            "attributes": {"name": "Widget", "price": 9.5, "active": true, "note": null},
            "associations": {
                "items": {"records": [{"id": "a1"}], "prototype": {"attributes": {"quantity": 1}}}
            }
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.attribute("price"), Some("9.5"));
        assert_eq!(record.attribute("active"), Some("true"));
        assert_eq!(record.attribute("note"), Some(""));

        let items = record.association("items").unwrap();
        assert_eq!(items.records[0].id.as_deref(), Some("a1"));
        assert_eq!(items.build().attribute("quantity"), Some("1"));
    }

    #[test]
    fn test_deserialize_empty_object() {
        let record: Record = serde_json::from_str("{}").unwrap();
        assert_eq!(record, Record::new());
    }
}
