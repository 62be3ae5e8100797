//! Error types for the catalog model
//!
//! Covers:
//! - Catalog validation (id collisions, broken parent references)
//! - CRUD on services and link trees
//! - YAML/JSON decoding and encoding

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Owner of an identifier in the shared service/link namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOwner {
    /// The id names a service
    Service,

    /// The id names a link inside the given service
    Link {
        /// Service owning the link tree
        service_id: String,
    },
}

impl Display for IdOwner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service => write!(f, "service"),
            Self::Link { service_id } => write!(f, "link in service '{service_id}'"),
        }
    }
}

/// Catalog model errors
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Two entities share one id in the service/link namespace
    #[error("duplicate id '{id}': used by {first} and {second}")]
    DuplicateId {
        id: String,
        first: IdOwner,
        second: IdOwner,
    },

    /// Service references a parent that is not in the catalog
    #[error("service '{service_id}' references unknown parent '{parent_id}'")]
    UnknownParent {
        service_id: String,
        parent_id: String,
    },

    /// Service is its own ancestor
    #[error("service '{service_id}' is part of a parent cycle")]
    ParentCycle { service_id: String },

    /// No service with the given id
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    /// No link with the given id in the given scope
    #[error("link '{link_id}' not found in {scope}")]
    LinkNotFound { link_id: String, scope: String },

    /// Environment is not part of the catalog
    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    /// Removing the environment would leave links with an empty restriction,
    /// widening them to every environment
    #[error("environment '{environment}' is the only scope of links {link_ids:?}")]
    EnvironmentInUse {
        environment: String,
        link_ids: Vec<String>,
    },

    /// Environment already exists in the catalog
    #[error("environment already exists: {0}")]
    EnvironmentExists(String),

    /// YAML decode/encode failure
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON decode/encode failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Create duplicate id error
    pub fn duplicate_id(id: impl Into<String>, first: IdOwner, second: IdOwner) -> Self {
        Self::DuplicateId {
            id: id.into(),
            first,
            second,
        }
    }

    /// Create link-not-found error scoped to a service
    pub fn link_not_found(link_id: impl Into<String>, service_id: &str) -> Self {
        Self::LinkNotFound {
            link_id: link_id.into(),
            scope: format!("service '{service_id}'"),
        }
    }

    /// Create link-not-found error for a catalog-wide lookup
    pub fn link_not_in_catalog(link_id: impl Into<String>) -> Self {
        Self::LinkNotFound {
            link_id: link_id.into(),
            scope: "catalog".to_string(),
        }
    }

    /// Check if error is a namespace collision
    #[inline]
    #[must_use]
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::DuplicateId { .. })
    }
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Record `owner` for `id`, failing if the id was already claimed
pub(crate) fn claim<'a>(
    owners: &mut HashMap<&'a str, IdOwner>,
    id: &'a str,
    owner: IdOwner,
) -> Result<()> {
    match owners.entry(id) {
        Entry::Occupied(first) => Err(ModelError::duplicate_id(id, first.get().clone(), owner)),
        Entry::Vacant(slot) => {
            slot.insert(owner);
            Ok(())
        }
    }
}
