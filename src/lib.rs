//! Refined search: boolean key:value queries over flattened resource records
//!
//! A query such as `label:web-00 AND tags:prod OR -tag:staging` is
//! normalized, parsed into a boolean tree and evaluated against a slice of
//! `SearchableItem`s. Queries without field constraints (and bare IPv6
//! addresses) fall back to substring search over the default fields.
//!
//! # Architecture
//!
//! - **Query**: normalization (`&&`/`||`), key/value clause grammar, boolean parser
//! - **Engine**: recursive evaluation with alias resolution and field coercion
//! - **Results**: grouping by entity type for display
//!
//! Evaluation never fails. Malformed queries and unknown fields match nothing.
//!
//! # Example Usage
//!
//! ```
//! use refined_search::{refined_search, EntityType, SearchableItem};
//!
//! let items = vec![
//!     SearchableItem::new(1, "web-001", EntityType::Linode).with_field("tags", vec!["prod"]),
//!     SearchableItem::new(2, "web-002", EntityType::Linode).with_field("tags", vec!["staging"]),
//! ];
//!
//! let results = refined_search("label:web AND -tag:staging", &items);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].label, "web-001");
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod fields;
pub mod formatter;
pub mod models;
pub mod output;
pub mod query;
pub mod results;

// Re-export commonly used types
pub use config::SearchConfig;
pub use engine::{refined_search, SearchEngine};
pub use fields::{flatten_searchable_item, FieldResolver};
pub use models::{EntityType, FieldValue, ItemValue, SearchableItem};
pub use query::{format_query, is_simple_query, parse_search, ParsedQuery, ParsedSearch, QueryNode};
pub use results::separate_results_by_entity;
