//! Selection resolution
//!
//! Applications store a flat set of ids that may name whole services or
//! individual links at any depth. Resolution is a two-level switch per
//! service:
//!
//! - service id selected: the service with all its top-level links, untouched
//! - otherwise: every selected link found anywhere in its tree, flattened
//!   into one list in pre-order, detached from unselected ancestors
//!
//! Services with neither are omitted. Ids that resolve to nothing are dropped
//! and reported in [`Resolution::dangling`]; selections are allowed to go
//! stale between catalog edits.
//!
//! Each id is classified once against a [`SelectionIndex`] instead of being
//! looked up as a service and then as a link at every call site.

use navdeck_model::{Application, Catalog, Link, LinkWalk, Service};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// What a selection id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identifier<'a> {
    /// A whole service
    Service(&'a str),

    /// A link inside a service's tree
    Link {
        /// Owning service
        service_id: &'a str,
        /// The link itself
        link_id: &'a str,
    },
}

/// Id lookup table over a service list
///
/// On a catalog that violates id uniqueness, a service id shadows a link
/// with the same id, and among links the first in catalog order wins.
#[derive(Debug, Clone)]
pub struct SelectionIndex<'a> {
    entries: HashMap<&'a str, Identifier<'a>>,
}

impl<'a> SelectionIndex<'a> {
    /// Index every service and every link at any depth
    #[must_use]
    pub fn new(services: &'a [Service]) -> Self {
        let mut entries = HashMap::new();
        for service in services {
            entries
                .entry(service.id.as_str())
                .or_insert(Identifier::Service(&service.id));
        }
        for service in services {
            for link in service.links_iter() {
                if let Entry::Vacant(slot) = entries.entry(link.id.as_str()) {
                    slot.insert(Identifier::Link {
                        service_id: &service.id,
                        link_id: &link.id,
                    });
                }
            }
        }
        Self { entries }
    }

    /// Classify an id
    #[inline]
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<Identifier<'a>> {
        self.entries.get(id).copied()
    }

    /// Number of indexed ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a service was selected whole or through some of its links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// The service id itself was selected
    Whole,
    /// Only links inside the service were selected
    Partial,
}

/// One implicated service and the links to display for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedService {
    /// The service, as found in the catalog
    pub service: Service,
    /// All top-level links (whole) or the flattened selected links (partial)
    pub links: Vec<Link>,
    /// How the service was selected
    pub kind: SelectionKind,
}

/// Full resolution result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Implicated services, in catalog order
    pub services: Vec<ResolvedService>,
    /// Selected ids that named nothing, in first-seen order
    pub dangling: Vec<String>,
}

impl Resolution {
    /// Total number of resolved links across services (top-level entries only)
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.services.iter().map(|resolved| resolved.links.len()).sum()
    }

    /// Resolved entry for a service
    #[must_use]
    pub fn service(&self, id: &str) -> Option<&ResolvedService> {
        self.services.iter().find(|resolved| resolved.service.id == id)
    }
}

/// Resolve a selection into the services and links it implies
pub fn resolve<I, S>(services: &[Service], selected: I) -> Vec<ResolvedService>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve_detailed(services, selected).services
}

/// Resolve a selection, also reporting the ids that resolved to nothing
pub fn resolve_detailed<I, S>(services: &[Service], selected: I) -> Resolution
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let index = SelectionIndex::new(services);
    let mut whole: HashSet<&str> = HashSet::new();
    let mut picked: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut dangling: Vec<String> = Vec::new();

    for id in selected {
        let id = id.as_ref();
        match index.resolve(id) {
            Some(Identifier::Service(service_id)) => {
                whole.insert(service_id);
            }
            Some(Identifier::Link {
                service_id,
                link_id,
            }) => {
                picked.entry(service_id).or_default().insert(link_id);
            }
            None => {
                if !dangling.iter().any(|seen| seen == id) {
                    tracing::debug!("Dropping unresolved selection id {}", id);
                    dangling.push(id.to_string());
                }
            }
        }
    }

    let resolved: Vec<ResolvedService> = services
        .iter()
        .filter_map(|service| {
            if whole.contains(service.id.as_str()) {
                return Some(ResolvedService {
                    service: service.clone(),
                    links: service.links.clone(),
                    kind: SelectionKind::Whole,
                });
            }
            let ids = picked.get(service.id.as_str())?;
            Some(ResolvedService {
                service: service.clone(),
                links: collect_selected(&service.links, ids),
                kind: SelectionKind::Partial,
            })
        })
        .collect();

    tracing::trace!(
        "Resolved selection into {} services ({} dangling ids)",
        resolved.len(),
        dangling.len()
    );

    Resolution {
        services: resolved,
        dangling,
    }
}

/// Resolve an application's selection against a catalog
pub fn resolve_application(catalog: &Catalog, application: &Application) -> Resolution {
    resolve_detailed(&catalog.services, &application.service_ids)
}

/// Every link in the forest whose id is selected, pre-order, subtrees intact
fn collect_selected(links: &[Link], ids: &HashSet<&str>) -> Vec<Link> {
    LinkWalk::new(links)
        .map(|(_, link)| link)
        .filter(|link| ids.contains(link.id.as_str()))
        .cloned()
        .collect()
}
