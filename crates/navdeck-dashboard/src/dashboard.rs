//! Dashboard façade
//!
//! Holds the current catalog snapshot and answers the navigation views a UI
//! renders on every interaction:
//! - environment groups for the environment picker
//! - the visible link tree of a service in an environment
//! - search hits across services
//! - application bundles, optionally scoped to an environment
//!
//! Resolver output is memoized per (catalog version, parameters). The
//! resolvers themselves stay pure.

use crate::cache::MemoTable;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use navdeck_model::{Application, Catalog, CatalogVersion, Environment, Link};
use navdeck_resolve::{
    filter_by_ids, filter_visible, resolve_application, resolve_groups_with, search,
    ResolvedGroup, ResolvedService,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// An application resolved into concrete services and links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bundle {
    /// The application definition
    pub application: Application,
    /// Environment the bundle was scoped to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    /// Implicated services in catalog order
    pub services: Vec<ResolvedService>,
}

impl Bundle {
    /// Total number of top-level resolved links
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.services.iter().map(|resolved| resolved.links.len()).sum()
    }
}

/// Counts describing how an application's selection resolves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    /// Number of implicated services
    pub services: usize,
    /// Number of top-level resolved links
    pub links: usize,
    /// Selected ids that matched nothing
    pub dangling: Vec<String>,
}

/// Search hits inside one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Owning service
    pub service_id: String,
    /// Pruned link tree: hits plus their ancestors
    pub links: Vec<Link>,
}

/// Memo table sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Cached environment groupings
    pub group_entries: u64,
    /// Cached visible link trees
    pub visible_entries: u64,
}

#[derive(Debug)]
struct Snapshot {
    catalog: Arc<Catalog>,
    version: CatalogVersion,
}

/// Catalog snapshot with memoized views
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    snapshot: RwLock<Snapshot>,
    groups: MemoTable<(), Vec<ResolvedGroup>>,
    visible: MemoTable<(String, Environment), Vec<Link>>,
}

impl Dashboard {
    /// Create dashboard over a catalog
    ///
    /// # Errors
    /// Returns error if `strict_ids` is set and the catalog fails validation
    pub fn new(catalog: Catalog, config: DashboardConfig) -> Result<Self> {
        let snapshot = Self::prepare(catalog, &config)?;
        tracing::info!(
            "Loaded catalog {} ({} services, {} environments)",
            snapshot.version.short(),
            snapshot.catalog.services.len(),
            snapshot.catalog.environments.len()
        );
        Ok(Self {
            groups: MemoTable::new(config.cache_capacity),
            visible: MemoTable::new(config.cache_capacity),
            snapshot: RwLock::new(snapshot),
            config,
        })
    }

    /// Create dashboard with default config
    ///
    /// # Errors
    /// Returns error if the catalog fails validation
    pub fn with_catalog(catalog: Catalog) -> Result<Self> {
        Self::new(catalog, DashboardConfig::default())
    }

    /// Replace the catalog snapshot
    ///
    /// Readers holding the previous `Arc<Catalog>` keep a consistent view.
    ///
    /// # Errors
    /// Returns error if validation fails; the current snapshot is kept
    pub fn install(&self, catalog: Catalog) -> Result<CatalogVersion> {
        let snapshot = Self::prepare(catalog, &self.config)?;
        let version = snapshot.version;
        let services = snapshot.catalog.services.len();

        let mut current = self
            .snapshot
            .write()
            .map_err(|_| DashboardError::LockPoisoned)?;
        let previous = current.version;
        *current = snapshot;
        drop(current);

        if previous == version {
            tracing::debug!("Reinstalled unchanged catalog {}", version.short());
        } else {
            tracing::info!(
                "Installed catalog {} over {} ({} services)",
                version.short(),
                previous.short(),
                services
            );
        }
        Ok(version)
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Current catalog
    ///
    /// # Errors
    /// Returns error if the snapshot lock is poisoned
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        Ok(self.current()?.0)
    }

    /// Version of the current catalog
    ///
    /// # Errors
    /// Returns error if the snapshot lock is poisoned
    pub fn version(&self) -> Result<CatalogVersion> {
        Ok(self.current()?.1)
    }

    /// Resolved environment groups of the current catalog
    ///
    /// # Errors
    /// Returns error if the snapshot lock is poisoned
    pub fn environment_groups(&self) -> Result<Arc<Vec<ResolvedGroup>>> {
        let (catalog, version) = self.current()?;
        Ok(self.groups.get_or_compute(version, (), || {
            resolve_groups_with(
                &catalog.environments,
                &catalog.groups,
                &self.config.grouping_options(),
            )
        }))
    }

    /// A service's link tree as visible in `env`
    ///
    /// # Errors
    /// Returns error if the service does not exist
    pub fn visible_links(&self, service_id: &str, env: &str) -> Result<Arc<Vec<Link>>> {
        let (catalog, version) = self.current()?;
        let service = catalog
            .service(service_id)
            .ok_or_else(|| DashboardError::ServiceNotFound(service_id.to_string()))?;

        Ok(self
            .visible
            .get_or_compute(version, (service_id.to_string(), env.to_string()), || {
                filter_visible(&service.links, env)
            }))
    }

    /// Search link names and URLs, in one service or across the catalog
    ///
    /// Services without hits are omitted.
    ///
    /// # Errors
    /// Returns error if `service_id` is given and does not exist
    pub fn search(&self, service_id: Option<&str>, query: &str) -> Result<Vec<SearchHit>> {
        let (catalog, _) = self.current()?;
        let scope: Vec<_> = match service_id {
            Some(id) => vec![catalog
                .service(id)
                .ok_or_else(|| DashboardError::ServiceNotFound(id.to_string()))?],
            None => catalog.services.iter().collect(),
        };

        let hits: Vec<SearchHit> = scope
            .into_iter()
            .filter_map(|service| {
                let links = search(&service.links, query);
                (!links.is_empty()).then(|| SearchHit {
                    service_id: service.id.clone(),
                    links,
                })
            })
            .collect();

        tracing::trace!("Search for {:?} hit {} services", query, hits.len());
        Ok(hits)
    }

    /// Environments an application's bundle is offered in
    ///
    /// Falls back to every catalog environment when the application does
    /// not restrict itself.
    ///
    /// # Errors
    /// Returns error if the application does not exist
    pub fn bundle_environments(&self, app_id: &str) -> Result<Vec<Environment>> {
        let (catalog, _) = self.current()?;
        let application = find_application(&catalog, app_id)?;
        Ok(match &application.environments {
            Some(environments) => environments.clone(),
            None => catalog.environments.iter().cloned().collect(),
        })
    }

    /// Resolve an application into a bundle, optionally scoped to `env`
    ///
    /// Environment scoping runs after selection: each service's resolved
    /// links are filtered for visibility and services left empty are dropped.
    ///
    /// # Errors
    /// - `ApplicationNotFound` if the application does not exist
    /// - `EnvironmentNotOffered` if `env` is outside the bundle's environments
    pub fn bundle(&self, app_id: &str, env: Option<&str>) -> Result<Bundle> {
        let (catalog, _) = self.current()?;
        let application = find_application(&catalog, app_id)?;

        if let Some(env) = env {
            let offered = match application.environments {
                Some(_) => application.offers(env),
                None => catalog.environments.contains(env),
            };
            if !offered {
                return Err(DashboardError::not_offered(app_id, env));
            }
        }

        let resolution = resolve_application(&catalog, application);
        let services = match env {
            None => resolution.services,
            Some(env) => resolution
                .services
                .into_iter()
                .filter_map(|mut resolved| {
                    resolved.links = filter_visible(&resolved.links, env);
                    (!resolved.links.is_empty()).then_some(resolved)
                })
                .collect(),
        };

        tracing::debug!(
            "Bundle {} resolved to {} services{}",
            app_id,
            services.len(),
            env.map(|env| format!(" in {env}")).unwrap_or_default()
        );

        Ok(Bundle {
            application: application.clone(),
            environment: env.map(str::to_string),
            services,
        })
    }

    /// Summarize how an application's selection resolves
    ///
    /// # Errors
    /// Returns error if the application does not exist
    pub fn selection_summary(&self, app_id: &str) -> Result<SelectionSummary> {
        let (catalog, _) = self.current()?;
        let application = find_application(&catalog, app_id)?;
        let resolution = resolve_application(&catalog, application);

        Ok(SelectionSummary {
            services: resolution.services.len(),
            links: resolution.link_count(),
            dangling: resolution.dangling,
        })
    }

    /// A service's link tree pruned to an application's selected links
    ///
    /// Ancestors of selected links are kept for context. A service selected
    /// whole is returned unpruned.
    ///
    /// # Errors
    /// Returns error if the application or the service does not exist
    pub fn selection_tree(&self, app_id: &str, service_id: &str) -> Result<Vec<Link>> {
        let (catalog, _) = self.current()?;
        let application = find_application(&catalog, app_id)?;
        let service = catalog
            .service(service_id)
            .ok_or_else(|| DashboardError::ServiceNotFound(service_id.to_string()))?;

        if application.selects(&service.id) {
            return Ok(service.links.clone());
        }
        let selected: HashSet<&str> = application.service_ids.iter().map(String::as_str).collect();
        Ok(filter_by_ids(&service.links, &selected))
    }

    /// Memo table sizes
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            group_entries: self.groups.entry_count(),
            visible_entries: self.visible.entry_count(),
        }
    }

    /// Drop every memoized view
    pub fn clear_cache(&self) {
        self.groups.invalidate_all();
        self.visible.invalidate_all();
    }

    fn current(&self) -> Result<(Arc<Catalog>, CatalogVersion)> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| DashboardError::LockPoisoned)?;
        Ok((Arc::clone(&snapshot.catalog), snapshot.version))
    }

    fn prepare(catalog: Catalog, config: &DashboardConfig) -> Result<Snapshot> {
        if config.strict_ids {
            catalog.validate()?;
        }
        let version = catalog.version()?;
        Ok(Snapshot {
            catalog: Arc::new(catalog),
            version,
        })
    }
}

fn find_application<'a>(catalog: &'a Catalog, app_id: &str) -> Result<&'a Application> {
    catalog
        .application(app_id)
        .ok_or_else(|| DashboardError::ApplicationNotFound(app_id.to_string()))
}
