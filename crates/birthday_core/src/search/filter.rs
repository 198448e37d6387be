//! Name/tag filtering over the roster.
//!
//! # Responsibility
//! - Case-insensitive substring match on names, combined with an optional
//!   exact tag filter.
//! - Derive the distinct tag list used to populate the filter control.

use crate::model::person::Person;

/// View-level filter input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    /// Search term matched case-insensitively against names. Empty matches
    /// everything.
    pub term: String,
    /// Optional tag that must be present in the entry's tag set.
    pub tag: Option<String>,
}

/// Returns the visible subset of `people` in roster order.
pub fn visible_people<'a>(people: &'a [Person], query: &FilterQuery) -> Vec<&'a Person> {
    let term = query.term.to_lowercase();
    people
        .iter()
        .filter(|person| {
            let name_hit = term.is_empty() || person.name.to_lowercase().contains(&term);
            let tag_hit = query
                .tag
                .as_ref()
                .map_or(true, |tag| person.tags.iter().any(|candidate| candidate == tag));
            name_hit && tag_hit
        })
        .collect()
}

/// Returns every distinct tag across the roster in first-seen order.
pub fn all_tags(people: &[Person]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for person in people {
        for tag in &person.tags {
            if !tags.iter().any(|known| known == tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}
