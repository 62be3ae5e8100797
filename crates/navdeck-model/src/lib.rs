//! navdeck Catalog Model
//!
//! The configuration document behind the navigation dashboard: a catalog of
//! infrastructure services, each owning a tree of environment-scoped links.
//!
//! # Core Concepts
//!
//! - [`Link`]: a navigable resource, optionally restricted to environments,
//!   with an owned list of child links
//! - [`Service`]: a catalog entry owning a link tree and optionally a parent service
//! - [`EnvironmentGroup`]: a named bucket of environments (explicit members and/or a glob)
//! - [`Application`]: a flat set of service and link ids bundled under one name
//! - [`Catalog`]: the whole document, with validation and YAML/JSON codecs
//! - [`CatalogVersion`]: Blake3 content hash of a catalog, used as a memo key
//!
//! # Example
//!
//! ```rust
//! use navdeck_model::{Catalog, Link, Service};
//!
//! let mut catalog = Catalog::new();
//! catalog.add_environment("prod-1");
//! catalog
//!     .add_service(Service::new("auth", "Auth Service").with_link(
//!         Link::new("auth-grafana", "Grafana", "https://grafana.example/auth")
//!             .with_environments(["prod-1"]),
//!     ))
//!     .unwrap();
//!
//! assert!(catalog.validate().is_ok());
//! assert!(catalog.find_link("auth-grafana").is_some());
//! ```

#![warn(unreachable_pub)]

mod application;
mod catalog;
mod column;
mod error;
mod group;
mod link;
mod service;
mod version;

pub use application::Application;
pub use catalog::Catalog;
pub use column::Column;
pub use error::{IdOwner, ModelError, Result};
pub use group::EnvironmentGroup;
pub use link::{find_link, find_link_mut, remove_link, Link, LinkWalk};
pub use service::Service;
pub use version::CatalogVersion;

/// Deployment environment name (opaque, case-sensitive)
pub type Environment = String;

/// Ordered, de-duplicated set of environment names
pub type EnvironmentSet = indexmap::IndexSet<Environment>;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the catalog model
    pub use crate::{
        Application, Catalog, CatalogVersion, Column, Environment, EnvironmentGroup,
        EnvironmentSet, Link, ModelError, Service,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
