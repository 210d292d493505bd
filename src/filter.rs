//! Category derivation and conjunctive filtering shared by the three catalogues.

use std::collections::BTreeSet;

/// Category that matches every item; always first in a category list.
pub const ALL_CATEGORY: &str = "All";

/// An item that can be filtered by title and tags.
pub trait Catalogued {
    fn title(&self) -> &str;
    fn tags(&self) -> &[String];
}

/// Flatten every item's tags into a sorted, deduplicated category list headed by "All".
///
/// Tags are trimmed and empty ones dropped. Comparison is case-sensitive.
pub fn derive_categories<T: Catalogued>(items: &[T]) -> Vec<String> {
    let unique: BTreeSet<&str> = items
        .iter()
        .flat_map(|item| item.tags().iter())
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect();
    with_all(unique.into_iter().map(str::to_string))
}

/// Prepend "All" to reference categories, dropping any upstream duplicate of it.
pub fn with_all<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    std::iter::once(ALL_CATEGORY.to_string())
        .chain(names.into_iter().filter(|n| n != ALL_CATEGORY))
        .collect()
}

pub fn matches_category<T: Catalogued>(item: &T, category: &str) -> bool {
    category == ALL_CATEGORY || item.tags().iter().any(|tag| tag.trim() == category)
}

pub fn matches_query<T: Catalogued>(item: &T, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || item.title().to_lowercase().contains(&query.to_lowercase())
}

/// Items matching both the category and the title query, in their original order.
pub fn filter_items<T: Catalogued + Clone>(items: &[T], category: &str, query: &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| matches_category(*item, category) && matches_query(*item, query))
        .cloned()
        .collect()
}
