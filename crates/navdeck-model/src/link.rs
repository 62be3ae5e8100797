//! Link trees
//!
//! Provides [`Link`], a node in a service's link tree, plus the slice-level
//! helpers ([`find_link`], [`find_link_mut`], [`remove_link`]) used by the
//! service and catalog CRUD operations.

use crate::EnvironmentSet;
use serde::{Deserialize, Serialize};

/// A navigable resource attached to a service
///
/// Children are owned exclusively by their parent; removing a link removes
/// its whole subtree. An empty `environments` set means "all environments".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Identifier, unique across every link and service in the catalog
    pub id: String,

    /// Display column this link is rendered under
    #[serde(default)]
    pub column_id: String,

    /// Display name
    pub name: String,

    /// Target URL
    #[serde(default)]
    pub url: String,

    /// Environments this link is scoped to (empty = all)
    #[serde(default, skip_serializing_if = "EnvironmentSet::is_empty")]
    pub environments: EnvironmentSet,

    /// Nested links, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Link>,
}

impl Link {
    /// Create unrestricted link with no children
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            column_id: String::new(),
            name: name.into(),
            url: url.into(),
            environments: EnvironmentSet::new(),
            children: Vec::new(),
        }
    }

    /// With display column
    #[inline]
    #[must_use]
    pub fn with_column(mut self, column_id: impl Into<String>) -> Self {
        self.column_id = column_id.into();
        self
    }

    /// With environment restriction
    #[must_use]
    pub fn with_environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environments = environments.into_iter().map(Into::into).collect();
        self
    }

    /// With one more child appended
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: Link) -> Self {
        self.children.push(child);
        self
    }

    /// With children appended in order
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Link>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns true if the link carries no environment restriction
    #[inline]
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.environments.is_empty()
    }

    /// Returns true if the link's own restriction admits `env`
    ///
    /// Children are not consulted; see the visibility resolver for the
    /// subtree-aware rule.
    #[inline]
    #[must_use]
    pub fn allows(&self, env: &str) -> bool {
        self.is_unrestricted() || self.environments.contains(env)
    }

    /// Returns true if the link has child links
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Pre-order walk over this link and its subtree, with depth (self = 0)
    #[inline]
    #[must_use]
    pub fn walk(&self) -> LinkWalk<'_> {
        LinkWalk::new(std::slice::from_ref(self))
    }

    /// All links strictly below this one, pre-order
    pub fn descendants(&self) -> impl Iterator<Item = &Link> {
        self.walk().skip(1).map(|(_, link)| link)
    }

    /// Ids of all links strictly below this one, pre-order
    #[must_use]
    pub fn descendant_ids(&self) -> Vec<&str> {
        self.descendants().map(|link| link.id.as_str()).collect()
    }

    /// Number of links in this subtree, self included
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        self.walk().count()
    }

    /// Find a link by id in this subtree, self included
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Link> {
        self.walk().map(|(_, link)| link).find(|link| link.id == id)
    }
}

/// Depth-first, pre-order iterator over a forest of links
///
/// Yields `(depth, link)` where top-level links have depth 0. Uses an
/// explicit stack, so arbitrarily deep trees do not grow the call stack.
#[derive(Debug, Clone)]
pub struct LinkWalk<'a> {
    stack: Vec<(usize, &'a Link)>,
}

impl<'a> LinkWalk<'a> {
    /// Walk the given top-level links in order
    #[must_use]
    pub fn new(links: &'a [Link]) -> Self {
        Self {
            stack: links.iter().rev().map(|link| (0, link)).collect(),
        }
    }
}

impl<'a> Iterator for LinkWalk<'a> {
    type Item = (usize, &'a Link);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, link) = self.stack.pop()?;
        self.stack
            .extend(link.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, link))
    }
}

/// Find a link by id anywhere in a forest
#[must_use]
pub fn find_link<'a>(links: &'a [Link], id: &str) -> Option<&'a Link> {
    LinkWalk::new(links)
        .map(|(_, link)| link)
        .find(|link| link.id == id)
}

/// Find a link by id anywhere in a forest, mutably
pub fn find_link_mut<'a>(links: &'a mut [Link], id: &str) -> Option<&'a mut Link> {
    for link in links.iter_mut() {
        if link.id == id {
            return Some(link);
        }
        if let Some(found) = find_link_mut(&mut link.children, id) {
            return Some(found);
        }
    }
    None
}

/// Detach a link and its subtree from a forest
///
/// Returns the removed link, or `None` if no link has that id.
pub fn remove_link(links: &mut Vec<Link>, id: &str) -> Option<Link> {
    if let Some(pos) = links.iter().position(|link| link.id == id) {
        return Some(links.remove(pos));
    }
    links
        .iter_mut()
        .find_map(|link| remove_link(&mut link.children, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<Link> {
        vec![
            Link::new("a", "Alpha", "https://a.example")
                .with_child(
                    Link::new("a1", "Alpha One", "https://a1.example")
                        .with_child(Link::new("a1x", "Deep", "https://deep.example")),
                )
                .with_child(Link::new("a2", "Alpha Two", "https://a2.example")),
            Link::new("b", "Beta", "https://b.example").with_environments(["prod"]),
        ]
    }

    #[test]
    fn walk_is_preorder_with_depth() {
        let links = tree();
        let visited: Vec<(usize, &str)> = LinkWalk::new(&links)
            .map(|(depth, link)| (depth, link.id.as_str()))
            .collect();

        assert_eq!(
            visited,
            vec![(0, "a"), (1, "a1"), (2, "a1x"), (1, "a2"), (0, "b")]
        );
    }

    #[test]
    fn allows_respects_restriction() {
        let links = tree();
        assert!(links[0].allows("anything"));
        assert!(links[1].allows("prod"));
        assert!(!links[1].allows("dev"));
        assert!(!links[1].allows("Prod"));
    }

    #[test]
    fn descendant_ids_skip_self() {
        let links = tree();
        assert_eq!(links[0].descendant_ids(), vec!["a1", "a1x", "a2"]);
        assert_eq!(links[0].subtree_len(), 4);
        assert!(links[1].descendant_ids().is_empty());
    }

    #[test]
    fn find_reaches_any_depth() {
        let links = tree();
        assert_eq!(find_link(&links, "a1x").map(|l| l.name.as_str()), Some("Deep"));
        assert!(find_link(&links, "missing").is_none());
        assert!(links[0].find("a2").is_some());
        assert!(links[0].find("b").is_none());
    }

    #[test]
    fn find_mut_edits_in_place() {
        let mut links = tree();
        find_link_mut(&mut links, "a1x").unwrap().name = "Renamed".to_string();
        assert_eq!(find_link(&links, "a1x").unwrap().name, "Renamed");
    }

    #[test]
    fn remove_cascades_subtree() {
        let mut links = tree();
        let removed = remove_link(&mut links, "a1").unwrap();

        assert_eq!(removed.children.len(), 1);
        assert!(find_link(&links, "a1").is_none());
        assert!(find_link(&links, "a1x").is_none());
        assert!(find_link(&links, "a2").is_some());
        assert!(remove_link(&mut links, "a1").is_none());
    }
}
