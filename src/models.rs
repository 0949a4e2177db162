//! Core data models for refined search
//!
//! These structures describe the flattened, read-only records the search
//! engine filters. Callers map their domain API responses into
//! `SearchableItem`s before handing them over; the engine never mutates them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Unique identifier of a searchable record (numeric or textual)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ItemValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemValue::Number(n) => write!(f, "{}", n),
            ItemValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemValue {
    fn from(value: i64) -> Self {
        ItemValue::Number(value)
    }
}

impl From<i32> for ItemValue {
    fn from(value: i32) -> Self {
        ItemValue::Number(i64::from(value))
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        ItemValue::Text(value.to_string())
    }
}

/// Kind of domain entity a record was projected from
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
    EnumString, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EntityType {
    Linode,
    Volume,
    Image,
    Domain,
    #[serde(rename = "nodebalancer")]
    #[strum(serialize = "nodebalancer")]
    NodeBalancer,
    KubernetesCluster,
    Bucket,
    Firewall,
    Database,
}

impl EntityType {
    /// Key used when grouping results of this type
    pub fn plural(&self) -> &'static str {
        match self {
            EntityType::Linode => "linodes",
            EntityType::Volume => "volumes",
            EntityType::Image => "images",
            EntityType::Domain => "domains",
            EntityType::NodeBalancer => "nodebalancers",
            EntityType::KubernetesCluster => "kubernetesClusters",
            EntityType::Bucket => "buckets",
            EntityType::Firewall => "firewalls",
            EntityType::Database => "databases",
        }
    }

    /// All plural group keys, in declaration order
    pub fn all_plurals() -> impl Iterator<Item = &'static str> {
        EntityType::iter().map(|t| t.plural())
    }
}

/// Value of a single searchable field
///
/// Records come from loosely-typed API payloads, so a field may hold a
/// string, a list of strings (tags, IP addresses) or nothing at all.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    #[default]
    Absent,
}

impl FieldValue {
    /// Collapse the value into the single string substring matching runs against.
    ///
    /// Lists are joined with a single space, absent values become "".
    pub fn as_search_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(values) => values.join(" "),
            FieldValue::Absent => String::new(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Absent,
            serde_json::Value::Array(values) => FieldValue::List(
                values.into_iter().filter_map(scalar_to_string).collect(),
            ),
            other => scalar_to_string(other).map_or(FieldValue::Absent, FieldValue::Text),
        }
    }
}

/// Render a JSON scalar the way it reads on screen
fn scalar_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(FieldValue::from_json(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for FieldValue {
    fn from(values: Vec<S>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// A flattened, queryable projection of a domain entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchableItem {
    /// Unique identifier
    pub value: ItemValue,
    /// Display name, always searched
    pub label: String,
    /// Which domain concept this record represents
    pub entity_type: EntityType,
    /// Entity-specific fields (tags, ips, region, ...)
    #[serde(default)]
    pub data: BTreeMap<String, FieldValue>,
}

impl SearchableItem {
    pub fn new(value: impl Into<ItemValue>, label: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            entity_type,
            data: BTreeMap::new(),
        }
    }

    /// Builder-style helper to attach a data field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }
}
