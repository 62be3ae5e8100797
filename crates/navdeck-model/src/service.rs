//! Catalog services
//!
//! A [`Service`] exclusively owns its link tree. Link CRUD here only sees
//! this one tree; catalog-wide id uniqueness is checked by [`crate::Catalog`].

use crate::error::{claim, IdOwner, ModelError, Result};
use crate::link::{self, Link, LinkWalk};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One piece of infrastructure in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Identifier, unique across every service and link in the catalog
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-form display group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Parent service, if this is a child service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Top-level links, in display order
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Service {
    /// Create top-level service with no links
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: None,
            parent_id: None,
            links: Vec::new(),
        }
    }

    /// With display group
    #[inline]
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// With parent service
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// With one more top-level link
    #[inline]
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// With top-level links appended in order
    #[must_use]
    pub fn with_links(mut self, links: impl IntoIterator<Item = Link>) -> Self {
        self.links.extend(links);
        self
    }

    /// Returns true if this service has a parent
    #[inline]
    #[must_use]
    pub fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Pre-order walk over the whole link tree
    #[inline]
    #[must_use]
    pub fn walk_links(&self) -> LinkWalk<'_> {
        LinkWalk::new(&self.links)
    }

    /// Every link in the tree, pre-order
    pub fn links_iter(&self) -> impl Iterator<Item = &Link> {
        self.walk_links().map(|(_, link)| link)
    }

    /// Total number of links at any depth
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.walk_links().count()
    }

    /// Find a link at any depth
    #[must_use]
    pub fn link(&self, id: &str) -> Option<&Link> {
        link::find_link(&self.links, id)
    }

    /// Add a link at top level, or under `parent` anywhere in the tree
    ///
    /// # Errors
    /// - `ModelError::DuplicateId` if an id of the new subtree repeats, is
    ///   already in this tree, or is the service's own id
    /// - `ModelError::LinkNotFound` if `parent` is not in this tree
    pub fn add_link(&mut self, parent: Option<&str>, new_link: Link) -> Result<()> {
        self.check_incoming(&new_link, None)?;

        match parent {
            None => self.links.push(new_link),
            Some(parent_id) => {
                let service_id = &self.id;
                link::find_link_mut(&mut self.links, parent_id)
                    .ok_or_else(|| ModelError::link_not_found(parent_id, service_id))?
                    .children
                    .push(new_link);
            }
        }
        Ok(())
    }

    /// Edit one link
    ///
    /// The edit runs on a copy that replaces the original only if its ids
    /// stay unique within this service.
    ///
    /// # Errors
    /// - `ModelError::LinkNotFound` if no link has that id
    /// - `ModelError::DuplicateId` if the edited subtree reuses a taken id
    pub fn update_link<F>(&mut self, id: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Link),
    {
        let current = self
            .link(id)
            .ok_or_else(|| ModelError::link_not_found(id, &self.id))?;
        let mut edited = current.clone();
        edit(&mut edited);
        self.check_incoming(&edited, Some(current))?;

        let service_id = &self.id;
        let target = link::find_link_mut(&mut self.links, id)
            .ok_or_else(|| ModelError::link_not_found(id, service_id))?;
        *target = edited;
        Ok(())
    }

    /// Remove a link and its whole subtree
    ///
    /// # Errors
    /// Returns `ModelError::LinkNotFound` if no link has that id
    pub fn remove_link(&mut self, id: &str) -> Result<Link> {
        link::remove_link(&mut self.links, id).ok_or_else(|| ModelError::link_not_found(id, &self.id))
    }

    /// Ids of `incoming` must not repeat, name this service, or name a link
    /// outside `replaced`
    fn check_incoming(&self, incoming: &Link, replaced: Option<&Link>) -> Result<()> {
        let freed: HashSet<&str> = replaced
            .map(|link| link.walk().map(|(_, link)| link.id.as_str()).collect())
            .unwrap_or_default();
        let owner = IdOwner::Link {
            service_id: self.id.clone(),
        };

        let mut seen: HashMap<&str, IdOwner> = HashMap::new();
        for (_, link) in incoming.walk() {
            claim(&mut seen, &link.id, owner.clone())?;
            if link.id == self.id {
                return Err(ModelError::duplicate_id(link.id.clone(), IdOwner::Service, owner));
            }
            if !freed.contains(link.id.as_str()) && self.link(&link.id).is_some() {
                return Err(ModelError::duplicate_id(link.id.clone(), owner.clone(), owner));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> Service {
        Service::new("auth", "Auth Service").with_links([
            Link::new("auth-logs", "Logs", "https://logs.example/auth"),
            Link::new("auth-dash", "Dashboards", "https://grafana.example")
                .with_child(Link::new("auth-dash-latency", "Latency", "https://grafana.example/latency")),
        ])
    }

    #[test]
    fn add_link_top_level_and_nested() {
        let mut service = auth();
        service
            .add_link(None, Link::new("auth-repo", "Repo", "https://git.example/auth"))
            .unwrap();
        service
            .add_link(
                Some("auth-dash-latency"),
                Link::new("auth-p99", "p99", "https://grafana.example/p99"),
            )
            .unwrap();

        assert_eq!(service.links.len(), 3);
        assert_eq!(service.link_count(), 5);
        assert_eq!(
            service.link("auth-dash-latency").unwrap().children[0].id,
            "auth-p99"
        );
    }

    #[test]
    fn add_link_rejects_missing_parent() {
        let mut service = auth();
        let result = service.add_link(Some("nope"), Link::new("x", "X", ""));
        assert!(matches!(result, Err(ModelError::LinkNotFound { .. })));
    }

    #[test]
    fn add_link_rejects_duplicate_in_tree() {
        let mut service = auth();
        let result = service.add_link(None, Link::new("auth-dash-latency", "Again", ""));
        assert!(matches!(result, Err(ModelError::DuplicateId { .. })));
    }

    #[test]
    fn add_link_rejects_repeats_inside_subtree() {
        let mut service = auth();
        let subtree = Link::new("auth-new", "New", "")
            .with_child(Link::new("auth-new", "Echo", ""));

        assert!(service.add_link(None, subtree).unwrap_err().is_duplicate_id());
        assert!(service
            .add_link(None, Link::new("auth", "Shadow", ""))
            .unwrap_err()
            .is_duplicate_id());
        assert_eq!(service.link_count(), 3);
    }

    #[test]
    fn update_link_rolls_back_on_collision() {
        let mut service = auth();
        let before = service.clone();

        let result = service.update_link("auth-logs", |link| link.id = "auth-dash".to_string());
        assert!(matches!(result, Err(ModelError::DuplicateId { ref id, .. }) if id == "auth-dash"));
        assert_eq!(service, before);

        service
            .update_link("auth-dash", |link| link.id = "auth-grafana".to_string())
            .unwrap();
        assert_eq!(service.link("auth-grafana").unwrap().children[0].id, "auth-dash-latency");
    }

    #[test]
    fn update_link_edits_nested() {
        let mut service = auth();
        service
            .update_link("auth-dash-latency", |link| {
                link.environments.insert("prod".to_string());
            })
            .unwrap();

        assert!(!service.link("auth-dash-latency").unwrap().allows("dev"));
        assert!(service.update_link("missing", |_| {}).is_err());
    }

    #[test]
    fn remove_link_cascades() {
        let mut service = auth();
        let removed = service.remove_link("auth-dash").unwrap();

        assert_eq!(removed.subtree_len(), 2);
        assert_eq!(service.link_count(), 1);
        assert!(service.link("auth-dash-latency").is_none());
    }

    #[test]
    fn child_service_flag() {
        assert!(!auth().is_child());
        assert!(auth().with_parent("platform").is_child());
    }
}
