//! Grouping of search results by entity type

use std::collections::BTreeMap;

use crate::models::{EntityType, SearchableItem};

/// Results keyed by pluralized entity type (`linodes`, `volumes`, ...)
pub type GroupedResults<'a> = BTreeMap<&'static str, Vec<&'a SearchableItem>>;

/// Split a combined result list into per-type groups.
///
/// Every entity type gets a key, even when it has no results. Items keep
/// their relative order within a group.
pub fn separate_results_by_entity<'a, I>(results: I) -> GroupedResults<'a>
where
    I: IntoIterator<Item = &'a SearchableItem>,
{
    let mut grouped: GroupedResults<'a> = EntityType::all_plurals()
        .map(|plural| (plural, Vec::new()))
        .collect();

    for item in results {
        grouped
            .entry(item.entity_type.plural())
            .or_default()
            .push(item);
    }

    grouped
}
