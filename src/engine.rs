//! Query evaluation
//!
//! `SearchEngine` filters a slice of `SearchableItem`s with a parsed query.
//! Evaluation never fails: malformed input, unknown fields and incomplete
//! boolean expressions simply match nothing. Results keep input order.

use crate::config::SearchConfig;
use crate::fields::{flatten_searchable_item, FieldResolver, FlatItem};
use crate::models::{FieldValue, SearchableItem};
use crate::query::clause::{strip_quotes, ParsedQuery};
use crate::query::{format_query, parse_search, QueryNode};

/// Evaluates queries against searchable items
#[derive(Debug, Clone)]
pub struct SearchEngine {
    resolver: FieldResolver,
    case_sensitive: bool,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            resolver: config.resolver(),
            case_sensitive: config.case_sensitive,
        }
    }

    /// Override case sensitivity for this engine
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Format, parse and evaluate `input` against `items`.
    ///
    /// Simple queries (no `key:value` clauses, or a bare IPv6 address) are
    /// matched as a whole against the default fields; everything else goes
    /// through the boolean tree.
    pub fn refined_search<'a>(&self, input: &str, items: &'a [SearchableItem]) -> Vec<&'a SearchableItem> {
        let query = format_query(input);
        if query.is_empty() {
            return Vec::new();
        }

        let parsed = parse_search(&query);

        let results: Vec<&SearchableItem> = items
            .iter()
            .filter(|item| {
                let flat = flatten_searchable_item(item);
                if parsed.is_simple {
                    self.any_field_matches(&flat, self.resolver.default_fields(), &query)
                } else {
                    self.evaluate(&parsed.tree, &flat)
                }
            })
            .collect();

        log::info!(
            "Query '{}' matched {} of {} items (simple={})",
            query,
            results.len(),
            items.len(),
            parsed.is_simple
        );

        results
    }

    /// Evaluate a query tree against one item
    pub fn recursively_test_item(&self, node: &QueryNode, item: &SearchableItem) -> bool {
        self.evaluate(node, &flatten_searchable_item(item))
    }

    /// Test a single clause (`label:web`, `-tags:a,b`, `web`) against an item
    pub fn test_item(&self, item: &SearchableItem, clause: &str) -> bool {
        self.test_clause(&flatten_searchable_item(item), clause)
    }

    /// True when `term` occurs in any default field of the item
    pub fn search_default_fields(&self, item: &SearchableItem, term: &str) -> bool {
        self.any_field_matches(&flatten_searchable_item(item), self.resolver.default_fields(), term)
    }

    /// True when `term` occurs in the named (canonical) field of the item
    pub fn does_search_term_match_item_field(&self, term: &str, item: &SearchableItem, field: &str) -> bool {
        self.term_matches_flat_field(term, &flatten_searchable_item(item), field)
    }

    fn evaluate(&self, node: &QueryNode, flat: &FlatItem) -> bool {
        match node {
            QueryNode::And { values } => values.iter().all(|v| self.evaluate(v, flat)),
            QueryNode::Or { values } => values.iter().any(|v| self.evaluate(v, flat)),
            QueryNode::String { value } => self.test_clause(flat, value),
            QueryNode::Invalid => false,
        }
    }

    fn test_clause(&self, flat: &FlatItem, clause: &str) -> bool {
        let info = ParsedQuery::parse(clause).query_info();

        let Some(field_name) = info.field_name else {
            return self.any_field_matches(flat, self.resolver.clause_fields(), strip_quotes(clause.trim()));
        };

        let key = self.resolver.real_entity_key(&field_name);
        if !self.resolver.is_known_field(flat, key) {
            log::trace!("Unknown field '{}' in clause '{}'", field_name, clause);
            return false;
        }

        let mut matches = info
            .search_terms
            .iter()
            .map(|term| self.term_matches_flat_field(term, flat, key));

        if info.is_negated {
            !matches.any(|m| m)
        } else {
            matches.all(|m| m)
        }
    }

    fn any_field_matches(&self, flat: &FlatItem, fields: &[String], term: &str) -> bool {
        fields
            .iter()
            .any(|field| self.term_matches_flat_field(term, flat, field))
    }

    fn term_matches_flat_field(&self, term: &str, flat: &FlatItem, field: &str) -> bool {
        match flat.get(field) {
            None | Some(FieldValue::Absent) => false,
            Some(value) => contains(&value.as_search_text(), term, self.case_sensitive),
        }
    }
}

fn contains(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Search `items` with the default configuration
pub fn refined_search<'a>(query: &str, items: &'a [SearchableItem]) -> Vec<&'a SearchableItem> {
    SearchEngine::default().refined_search(query, items)
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

    fn engine() -> SearchEngine {
        SearchEngine::default()
    }

    #[test]
    fn test_test_item_substring() {
        let item = mock_linode();
        let engine = engine();

        for term in ["my-linode", "my-", "linode", "production", "my-app", "n", "MY-LINODE"] {
            assert!(engine.test_item(&item, term), "{:?} should match", term);
        }
        assert!(!engine.test_item(&item, "hello"));
    }

    #[test]
    fn test_test_item_field_clause() {
        let item = mock_linode();
        let engine = engine();

        assert!(engine.test_item(&item, "tags:my-app,production"));
        assert!(!engine.test_item(&item, "tags:my-app,unrelated-app"));
        assert!(engine.test_item(&item, "name:my-linode"));
        assert!(engine.test_item(&item, "type:linode"));
        assert!(!engine.test_item(&item, "type:domain"));
    }

    #[test]
    fn test_negated_clause() {
        let item = mock_linode();
        let engine = engine();

        assert!(!engine.test_item(&item, "-label:my-linode"));
        assert!(engine.test_item(&item, "-label:other"));
        assert!(!engine.test_item(&item, "-tag:production,unrelated-app"));
        assert!(engine.test_item(&item, "-tag:staging,unrelated-app"));
    }

    #[test]
    fn test_unknown_field_never_matches() {
        let item = mock_linode();
        let engine = engine();

        assert!(!engine.test_item(&item, "unknown:hello"));
        assert!(!engine.test_item(&item, "-unknown:hello"));
    }

    #[test]
    fn test_missing_known_field_is_empty() {
        let domain = SearchableItem::new(4, "example.com", EntityType::Domain);
        let engine = engine();

        assert!(!engine.test_item(&domain, "ips:10.0"));
        assert!(engine.test_item(&domain, "-ips:10.0"));
    }

    #[test]
    fn test_free_text_clause_searches_value() {
        let item = SearchableItem::new(9876, "web", EntityType::Linode);
        let engine = engine();

        assert!(engine.test_item(&item, "9876"));
        assert!(!engine.search_default_fields(&item, "9876"));

        let tree = QueryNode::And {
            values: vec![QueryNode::string("type:linode"), QueryNode::string("98")],
        };
        assert!(engine.recursively_test_item(&tree, &item));
    }

    #[test]
    fn test_search_default_fields() {
        let item = mock_linode();
        let engine = engine();

        assert!(engine.search_default_fields(&item, "my-linode"));
        assert!(engine.search_default_fields(&item, "production"));
        assert!(engine.search_default_fields(&item, "1234"));
        assert!(!engine.search_default_fields(&item, "linode my-app"));
    }

    #[test]
    fn test_does_search_term_match_item_field() {
        let item = mock_linode();
        let engine = engine();

        assert!(engine.does_search_term_match_item_field("my-app", &item, "tags"));
        assert!(!engine.does_search_term_match_item_field("my-app", &item, "ips"));
        assert!(engine.does_search_term_match_item_field("12", &item, "ips"));
        assert!(!engine.does_search_term_match_item_field("12", &item, "region"));
    }

    #[test]
    fn test_recursively_test_item() {
        let item = mock_linode();
        let engine = engine();

        let both = QueryNode::And {
            values: vec![QueryNode::string("tags:my-app"), QueryNode::string("tags:production")],
        };
        assert!(engine.recursively_test_item(&both, &item));

        let either = QueryNode::Or {
            values: vec![QueryNode::string("tags:staging"), QueryNode::string("tags:production")],
        };
        assert!(engine.recursively_test_item(&either, &item));

        let nested = QueryNode::Or {
            values: vec![
                QueryNode::string("type:domain"),
                QueryNode::And {
                    values: vec![QueryNode::string("tag:my-app"), QueryNode::string("type:linode")],
                },
            ],
        };
        assert!(engine.recursively_test_item(&nested, &item));
    }

    #[test]
    fn test_invalid_and_empty_nodes() {
        let item = mock_linode();
        let engine = engine();

        assert!(!engine.recursively_test_item(&QueryNode::Invalid, &item));
        assert!(engine.recursively_test_item(&QueryNode::And { values: vec![] }, &item));
        assert!(!engine.recursively_test_item(&QueryNode::Or { values: vec![] }, &item));
    }

    #[test]
    fn test_case_sensitivity() {
        let item = mock_linode();
        let sensitive = engine().case_sensitive(true);

        assert!(!sensitive.test_item(&item, "MY-LINODE"));
        assert!(sensitive.test_item(&item, "my-linode"));
        assert!(!sensitive.test_item(&item, "label:My"));
    }

    #[test]
    fn test_empty_query() {
        let items = vec![mock_linode()];
        assert!(refined_search("", &items).is_empty());
        assert!(refined_search("   ", &items).is_empty());
    }
}
