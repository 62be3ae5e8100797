//! The catalog document
//!
//! [`Catalog`] is the single configuration document the dashboard persists
//! as one blob: services, columns, environments, environment groups and
//! applications. It round-trips through YAML and JSON without loss.
//!
//! Service and link ids share one namespace. [`Catalog::validate`] rejects
//! collisions; the CRUD operations here refuse to introduce them.

use crate::error::{claim, IdOwner, ModelError, Result};
use crate::link::{self, Link};
use crate::{Application, CatalogVersion, Column, EnvironmentGroup, EnvironmentSet, Service};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Whole dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Services in display order
    #[serde(default)]
    pub services: Vec<Service>,

    /// Display columns in display order
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Known environments, insertion order preserved
    #[serde(default)]
    pub environments: EnvironmentSet,

    /// Environment groups in precedence order (first group wins)
    #[serde(default, rename = "environmentGroups")]
    pub groups: Vec<EnvironmentGroup>,

    /// Application bundles
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl Catalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Codecs
    // ------------------------------------------------------------------

    /// Parse from YAML
    ///
    /// # Errors
    /// Returns `ModelError::Yaml` if the document is malformed
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Encode as YAML
    ///
    /// # Errors
    /// Returns `ModelError::Yaml` if encoding fails
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns `ModelError::Json` if the document is malformed
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as pretty-printed JSON
    ///
    /// # Errors
    /// Returns `ModelError::Json` if encoding fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Content hash of this document
    ///
    /// # Errors
    /// Returns error if the catalog cannot be encoded
    #[inline]
    pub fn version(&self) -> Result<CatalogVersion> {
        CatalogVersion::of(self)
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Check catalog invariants
    ///
    /// - every service id and link id is unique across the shared namespace
    /// - every `parent_id` names a service in the catalog
    /// - no service is its own ancestor
    ///
    /// Dangling `column_id`s and stale application selections are allowed.
    ///
    /// # Errors
    /// Returns the first violation found, in catalog order
    pub fn validate(&self) -> Result<()> {
        let mut owners: HashMap<&str, IdOwner> = HashMap::new();
        for service in &self.services {
            claim(&mut owners, &service.id, IdOwner::Service)?;
            for link in service.links_iter() {
                claim(
                    &mut owners,
                    &link.id,
                    IdOwner::Link {
                        service_id: service.id.clone(),
                    },
                )?;
            }
        }

        for service in &self.services {
            if let Some(parent_id) = &service.parent_id {
                if self.service(parent_id).is_none() {
                    return Err(ModelError::UnknownParent {
                        service_id: service.id.clone(),
                        parent_id: parent_id.clone(),
                    });
                }
            }
        }

        for service in &self.services {
            self.check_ancestry(service)?;
        }

        Ok(())
    }

    fn check_ancestry(&self, service: &Service) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = service;
        while let Some(parent_id) = current.parent_id.as_deref() {
            if parent_id == service.id {
                return Err(ModelError::ParentCycle {
                    service_id: service.id.clone(),
                });
            }
            // a cycle further up the chain is reported for its own members
            if !seen.insert(parent_id) {
                break;
            }
            match self.service(parent_id) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Ok(())
    }

    /// Who owns `id` in the shared namespace, if anyone
    #[must_use]
    pub fn id_owner(&self, id: &str) -> Option<IdOwner> {
        if self.service(id).is_some() {
            return Some(IdOwner::Service);
        }
        self.find_link(id).map(|(service, _)| IdOwner::Link {
            service_id: service.id.clone(),
        })
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Service by id
    #[must_use]
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.id == id)
    }

    /// Service by id, mutably
    pub fn service_mut(&mut self, id: &str) -> Option<&mut Service> {
        self.services.iter_mut().find(|service| service.id == id)
    }

    /// Link by id at any depth, with its owning service
    #[must_use]
    pub fn find_link(&self, id: &str) -> Option<(&Service, &Link)> {
        self.services
            .iter()
            .find_map(|service| service.link(id).map(|link| (service, link)))
    }

    /// Services whose parent is `parent_id`, in catalog order
    pub fn child_services<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Service> + 'a {
        self.services
            .iter()
            .filter(move |service| service.parent_id.as_deref() == Some(parent_id))
    }

    /// Services without a parent, in catalog order
    pub fn root_services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|service| !service.is_child())
    }

    /// Application by id
    #[must_use]
    pub fn application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|app| app.id == id)
    }

    /// Column by id
    #[must_use]
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Environment group by id
    #[must_use]
    pub fn group(&self, id: &str) -> Option<&EnvironmentGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    // ------------------------------------------------------------------
    // Environments
    // ------------------------------------------------------------------

    /// Add an environment at the end; returns false if already present
    pub fn add_environment(&mut self, env: impl Into<String>) -> bool {
        self.environments.insert(env.into())
    }

    /// Remove an environment and every reference to it
    ///
    /// Strips the name from link restrictions, group members and
    /// application offerings. Returns true if the catalog listed it.
    ///
    /// # Errors
    /// Returns `ModelError::EnvironmentInUse` if some link is scoped to `env`
    /// alone; its emptied restriction would mean "all environments". The
    /// catalog is left unchanged.
    pub fn remove_environment(&mut self, env: &str) -> Result<bool> {
        let pinned: Vec<String> = self
            .services
            .iter()
            .flat_map(Service::links_iter)
            .filter(|link| link.environments.len() == 1 && link.environments.contains(env))
            .map(|link| link.id.clone())
            .collect();
        if !pinned.is_empty() {
            return Err(ModelError::EnvironmentInUse {
                environment: env.to_string(),
                link_ids: pinned,
            });
        }

        let existed = self.environments.shift_remove(env);

        for service in &mut self.services {
            for_each_link_mut(&mut service.links, &mut |link| {
                link.environments.shift_remove(env);
            });
        }
        for group in &mut self.groups {
            group.environments.retain(|member| member != env);
        }
        for app in &mut self.applications {
            if let Some(envs) = app.environments.as_mut() {
                envs.retain(|offered| offered != env);
            }
        }

        tracing::debug!("Removed environment {} (listed: {})", env, existed);
        Ok(existed)
    }

    /// Rename an environment everywhere, keeping its position
    ///
    /// # Errors
    /// - `ModelError::EnvironmentNotFound` if `from` is not listed
    /// - `ModelError::EnvironmentExists` if `to` is already listed
    pub fn rename_environment(&mut self, from: &str, to: &str) -> Result<()> {
        if !self.environments.contains(from) {
            return Err(ModelError::EnvironmentNotFound(from.to_string()));
        }
        if self.environments.contains(to) {
            return Err(ModelError::EnvironmentExists(to.to_string()));
        }

        self.environments = rename_in_set(&self.environments, from, to);
        for service in &mut self.services {
            for_each_link_mut(&mut service.links, &mut |link| {
                if link.environments.contains(from) {
                    link.environments = rename_in_set(&link.environments, from, to);
                }
            });
        }
        for group in &mut self.groups {
            rename_in_vec(&mut group.environments, from, to);
        }
        for app in &mut self.applications {
            if let Some(envs) = app.environments.as_mut() {
                rename_in_vec(envs, from, to);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Services and links
    // ------------------------------------------------------------------

    /// Append a service
    ///
    /// # Errors
    /// Returns `ModelError::DuplicateId` if the service id or any of its link
    /// ids is already taken, or repeats within the new service
    pub fn add_service(&mut self, service: Service) -> Result<()> {
        let mut incoming: HashMap<&str, IdOwner> = HashMap::new();
        claim(&mut incoming, &service.id, IdOwner::Service)?;
        for link in service.links_iter() {
            claim(
                &mut incoming,
                &link.id,
                IdOwner::Link {
                    service_id: service.id.clone(),
                },
            )?;
        }
        for (id, owner) in &incoming {
            if let Some(existing) = self.id_owner(id) {
                return Err(ModelError::duplicate_id(*id, existing, owner.clone()));
            }
        }

        self.services.push(service);
        Ok(())
    }

    /// Remove a service
    ///
    /// Child services are detached (their `parent_id` is cleared) and the
    /// service id plus all its link ids are dropped from every application.
    ///
    /// # Errors
    /// Returns `ModelError::ServiceNotFound` if no service has that id
    pub fn remove_service(&mut self, id: &str) -> Result<Service> {
        let pos = self
            .services
            .iter()
            .position(|service| service.id == id)
            .ok_or_else(|| ModelError::ServiceNotFound(id.to_string()))?;
        let removed = self.services.remove(pos);

        for child in &mut self.services {
            if child.parent_id.as_deref() == Some(id) {
                child.parent_id = None;
            }
        }

        let mut stale: HashSet<&str> = removed.links_iter().map(|link| link.id.as_str()).collect();
        stale.insert(removed.id.as_str());
        self.drop_from_selections(&stale);

        tracing::debug!("Removed service {} ({} links)", id, removed.link_count());
        Ok(removed)
    }

    /// Add a link to a service, at top level or under `parent`
    ///
    /// # Errors
    /// - `ModelError::ServiceNotFound` if the service is absent
    /// - `ModelError::DuplicateId` if any id in the new subtree is taken or
    ///   repeats within the subtree
    /// - `ModelError::LinkNotFound` if `parent` is not in that service
    pub fn add_link(&mut self, service_id: &str, parent: Option<&str>, new_link: Link) -> Result<()> {
        if self.service(service_id).is_none() {
            return Err(ModelError::ServiceNotFound(service_id.to_string()));
        }
        self.check_incoming(service_id, &new_link, None)?;

        self.service_mut(service_id)
            .ok_or_else(|| ModelError::ServiceNotFound(service_id.to_string()))?
            .add_link(parent, new_link)
    }

    /// Edit a link, wherever it lives
    ///
    /// The edit runs on a copy of the link's subtree. The copy replaces the
    /// original only if its ids are still unique across the catalog, so a
    /// rejected edit leaves the catalog untouched.
    ///
    /// # Errors
    /// - `ModelError::LinkNotFound` if no service owns that link
    /// - `ModelError::DuplicateId` if the edited subtree reuses a taken id
    pub fn update_link<F>(&mut self, link_id: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Link),
    {
        let (service, current) = self
            .find_link(link_id)
            .ok_or_else(|| ModelError::link_not_in_catalog(link_id))?;
        let mut edited = current.clone();
        edit(&mut edited);
        self.check_incoming(&service.id, &edited, Some(current))?;

        let target = self
            .services
            .iter_mut()
            .find_map(|service| link::find_link_mut(&mut service.links, link_id))
            .ok_or_else(|| ModelError::link_not_in_catalog(link_id))?;
        *target = edited;
        Ok(())
    }

    /// Remove a link and its subtree, wherever it lives
    ///
    /// The removed ids are dropped from every application.
    ///
    /// # Errors
    /// Returns `ModelError::LinkNotFound` if no service owns that link
    pub fn remove_link(&mut self, link_id: &str) -> Result<Link> {
        let removed = self
            .services
            .iter_mut()
            .find_map(|service| link::remove_link(&mut service.links, link_id))
            .ok_or_else(|| ModelError::link_not_in_catalog(link_id))?;

        let stale: HashSet<&str> = removed.walk().map(|(_, link)| link.id.as_str()).collect();
        self.drop_from_selections(&stale);
        Ok(removed)
    }

    /// Check the ids of a subtree about to enter `service_id`
    ///
    /// Ids must not repeat inside the subtree nor name anything else in the
    /// catalog. Ids of `replaced`, the subtree being swapped out, are free.
    fn check_incoming(&self, service_id: &str, incoming: &Link, replaced: Option<&Link>) -> Result<()> {
        let freed: HashSet<&str> = replaced
            .map(|link| link.walk().map(|(_, link)| link.id.as_str()).collect())
            .unwrap_or_default();
        let owner = IdOwner::Link {
            service_id: service_id.to_string(),
        };

        let mut seen: HashMap<&str, IdOwner> = HashMap::new();
        for (_, link) in incoming.walk() {
            claim(&mut seen, &link.id, owner.clone())?;
            if freed.contains(link.id.as_str()) {
                continue;
            }
            if let Some(existing) = self.id_owner(&link.id) {
                return Err(ModelError::duplicate_id(link.id.clone(), existing, owner));
            }
        }
        Ok(())
    }

    fn drop_from_selections(&mut self, stale: &HashSet<&str>) {
        for app in &mut self.applications {
            app.service_ids.retain(|id| !stale.contains(id.as_str()));
        }
    }
}

fn for_each_link_mut<F>(links: &mut [Link], f: &mut F)
where
    F: FnMut(&mut Link),
{
    for link in links {
        f(link);
        for_each_link_mut(&mut link.children, f);
    }
}

fn rename_in_set(set: &EnvironmentSet, from: &str, to: &str) -> EnvironmentSet {
    set.iter()
        .map(|env| if env == from { to.to_string() } else { env.clone() })
        .collect()
}

fn rename_in_vec(envs: &mut [String], from: &str, to: &str) {
    for env in envs.iter_mut().filter(|env| env.as_str() == from) {
        *env = to.to_string();
    }
}
