//! Query text handling: normalization, clause grammar and boolean parsing
//!
//! Pipeline: `format_query` -> `parse_search` -> evaluation in `engine`.

pub mod clause;
pub mod normalize;
pub mod parser;

pub use clause::{Condition, ParsedQuery, QueryInfo, TextSegment};
pub use normalize::format_query;
pub use parser::{is_simple_query, parse_search, parse_tree, ParsedSearch, QueryNode};
