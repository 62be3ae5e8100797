//! navdeck Dashboard
//!
//! Caller-side façade over the resolution engine. A [`Dashboard`] holds one
//! catalog snapshot at a time and provides:
//!
//! - **Memoized views**: environment groups and per-environment link trees,
//!   cached per (catalog version, parameters) with moka
//! - **Bundles**: applications resolved into services and links, optionally
//!   scoped to an environment
//! - **Snapshot swaps**: [`Dashboard::install`] validates and replaces the
//!   catalog without invalidating readers
//!
//! # Example
//!
//! ```rust
//! use navdeck_dashboard::{Dashboard, DashboardConfig};
//! use navdeck_model::{Catalog, Link, Service};
//!
//! let mut catalog = Catalog::new();
//! catalog.add_environment("dev-1");
//! catalog.add_service(
//!     Service::new("auth", "Auth").with_link(Link::new("logs", "Logs", "https://logs.example")),
//! )?;
//!
//! let dashboard = Dashboard::new(catalog, DashboardConfig::default())?;
//! let links = dashboard.visible_links("auth", "dev-1")?;
//! assert_eq!(links.len(), 1);
//! # Ok::<(), navdeck_dashboard::DashboardError>(())
//! ```

#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;

// Re-exports
pub use cache::MemoTable;
pub use config::DashboardConfig;
pub use dashboard::{Bundle, Dashboard, DashboardStats, SearchHit, SelectionSummary};
pub use error::{DashboardError, Result};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for dashboard callers
    pub use crate::{Bundle, Dashboard, DashboardConfig, DashboardError, SelectionSummary};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
