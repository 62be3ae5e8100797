//! Link tree search and id filtering
//!
//! Text search matches `name` or `url`, case-insensitively, as a substring.
//! Id filtering powers "show only selected" views. Both prune like the
//! visibility filter: ancestors of a hit stay as context, unmatched siblings
//! are dropped.

use crate::tree;
use navdeck_model::Link;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

/// Returns true if the link itself (not a descendant) matches `query`
///
/// Renderers use this to tell hits apart from context ancestors.
#[must_use]
pub fn is_direct_match(link: &Link, query: &str) -> bool {
    direct_match(link, &query.to_lowercase())
}

/// Returns true if the link or any descendant matches `query`
#[must_use]
pub fn matches(link: &Link, query: &str) -> bool {
    let needle = query.to_lowercase();
    tree::any_in_subtree(link, &|candidate: &Link| direct_match(candidate, &needle))
}

/// Prune a link forest to the hits for `query` plus their ancestors
///
/// An empty query matches everything.
#[must_use]
pub fn search(links: &[Link], query: &str) -> Vec<Link> {
    let needle = query.to_lowercase();
    tree::prune(links, &|candidate: &Link| direct_match(candidate, &needle))
}

/// Returns true if the link or any descendant has an id in `ids`
pub fn contains_any<S>(link: &Link, ids: &HashSet<S>) -> bool
where
    S: Borrow<str> + Hash + Eq,
{
    tree::any_in_subtree(link, &|candidate: &Link| ids.contains(candidate.id.as_str()))
}

/// Prune a link forest to the links in `ids` plus their ancestors
pub fn filter_by_ids<S>(links: &[Link], ids: &HashSet<S>) -> Vec<Link>
where
    S: Borrow<str> + Hash + Eq,
{
    tree::prune(links, &|candidate: &Link| ids.contains(candidate.id.as_str()))
}

fn direct_match(link: &Link, needle: &str) -> bool {
    link.name.to_lowercase().contains(needle) || link.url.to_lowercase().contains(needle)
}
