//! Field flattening and key resolution
//!
//! A query names fields the way users think of them (`name`, `tag`, `ip`),
//! while records store them under canonical keys (`label`, `tags`, `ips`).
//! This module owns that mapping and the flattened view of a record.

use std::collections::{BTreeMap, HashMap};

use crate::models::{FieldValue, SearchableItem};

/// Canonical keys every flattened record carries
pub const CORE_FIELDS: &[&str] = &["label", "value", "entityType"];

/// Fields searched by a simple query
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &["label", "tags", "ips"];

/// Extra field searched by free-text clauses inside a boolean query
pub const CLAUSE_EXTRA_FIELD: &str = "value";

/// Built-in synonym table (user-facing key -> canonical key)
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("name", "label"),
    ("title", "label"),
    ("tag", "tags"),
    ("group", "tags"),
    ("ip", "ips"),
    ("type", "entityType"),
];

/// Flattened record: core properties and `data` entries side by side
pub type FlatItem = BTreeMap<String, FieldValue>;

/// Merge an item's `data` properties with its core properties.
///
/// Entries in `data` win over core properties of the same name.
pub fn flatten_searchable_item(item: &SearchableItem) -> FlatItem {
    let mut flat = FlatItem::new();
    flat.insert("label".to_string(), FieldValue::Text(item.label.clone()));
    flat.insert("value".to_string(), FieldValue::Text(item.value.to_string()));
    flat.insert(
        "entityType".to_string(),
        FieldValue::Text(item.entity_type.to_string()),
    );

    for (key, value) in &item.data {
        flat.insert(key.clone(), value.clone());
    }

    flat
}

/// Resolves user-facing field names to canonical record keys
#[derive(Debug, Clone)]
pub struct FieldResolver {
    aliases: HashMap<String, String>,
    default_fields: Vec<String>,
    clause_fields: Vec<String>,
}

impl Default for FieldResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALIASES
                .iter()
                .map(|(alias, key)| (alias.to_string(), key.to_string())),
            DEFAULT_SEARCH_FIELDS.iter().map(|s| s.to_string()),
        )
    }
}

impl FieldResolver {
    pub fn new(
        aliases: impl IntoIterator<Item = (String, String)>,
        default_fields: impl IntoIterator<Item = String>,
    ) -> Self {
        let default_fields: Vec<String> = default_fields.into_iter().collect();

        let mut clause_fields = default_fields.clone();
        if !clause_fields.iter().any(|f| f == CLAUSE_EXTRA_FIELD) {
            clause_fields.push(CLAUSE_EXTRA_FIELD.to_string());
        }

        Self {
            aliases: aliases.into_iter().collect(),
            default_fields,
            clause_fields,
        }
    }

    /// Canonical key for `field`, or `field` itself when it has no alias
    pub fn real_entity_key<'a>(&'a self, field: &'a str) -> &'a str {
        self.aliases.get(field).map(String::as_str).unwrap_or(field)
    }

    /// Fields searched by a simple query
    pub fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    /// Fields searched by a clause without a field name: the default
    /// fields plus the item's `value`
    pub fn clause_fields(&self) -> &[String] {
        &self.clause_fields
    }

    /// Whether `key` (already resolved) names a field this record can be searched by.
    ///
    /// Keys the record does not carry still count when they are part of the
    /// standard vocabulary, so `ips:` on a domain is an empty match rather
    /// than an unknown field.
    pub fn is_known_field(&self, flat: &FlatItem, key: &str) -> bool {
        flat.contains_key(key)
            || CORE_FIELDS.contains(&key)
            || self.default_fields.iter().any(|f| f == key)
            || self.aliases.values().any(|target| target == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityType;

    fn mock_linode() -> SearchableItem {
        SearchableItem::new(1234, "my-linode", EntityType::Linode)
            .with_field("tags", vec!["my-app", "production"])
            .with_field("ips", vec!["1234"])
    }

    #[test]
    fn test_flatten_merges_data() {
        let flat = flatten_searchable_item(&mock_linode());

        assert!(flat.contains_key("tags"));
        assert!(flat.contains_key("ips"));
        assert!(!flat.contains_key("data"));
        assert_eq!(flat["entityType"], FieldValue::from("linode"));
        assert_eq!(flat["value"], FieldValue::from("1234"));
    }

    #[test]
    fn test_flatten_data_overrides_core() {
        let item = mock_linode().with_field("label", "overridden");
        let flat = flatten_searchable_item(&item);

        assert_eq!(flat["label"], FieldValue::from("overridden"));
    }

    #[test]
    fn test_real_entity_key() {
        let resolver = FieldResolver::default();

        assert_eq!(resolver.real_entity_key("name"), "label");
        assert_eq!(resolver.real_entity_key("title"), "label");
        assert_eq!(resolver.real_entity_key("tag"), "tags");
        assert_eq!(resolver.real_entity_key("group"), "tags");
        assert_eq!(resolver.real_entity_key("ip"), "ips");
        assert_eq!(resolver.real_entity_key("hello"), "hello");
        assert_eq!(resolver.real_entity_key(""), "");
    }

    #[test]
    fn test_known_fields() {
        let resolver = FieldResolver::default();
        let domain = flatten_searchable_item(&SearchableItem::new(4, "example.com", EntityType::Domain));
        let custom = flatten_searchable_item(&mock_linode().with_field("region", "us-east"));

        assert!(resolver.is_known_field(&domain, "label"));
        assert!(resolver.is_known_field(&domain, "ips"));
        assert!(resolver.is_known_field(&domain, "entityType"));
        assert!(!resolver.is_known_field(&domain, "unknown"));
        assert!(!resolver.is_known_field(&domain, "region"));
        assert!(resolver.is_known_field(&custom, "region"));
    }

    #[test]
    fn test_clause_fields_add_value() {
        let resolver = FieldResolver::default();
        assert_eq!(resolver.default_fields(), ["label", "tags", "ips"]);
        assert_eq!(resolver.clause_fields(), ["label", "tags", "ips", "value"]);

        let custom = FieldResolver::new(Vec::<(String, String)>::new(), vec!["value".to_string(), "label".to_string()]);
        assert_eq!(custom.clause_fields(), ["value", "label"]);
    }
}
