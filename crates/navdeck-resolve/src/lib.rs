//! navdeck Resolution Engine
//!
//! Pure functions that answer the dashboard's recurring questions about a
//! catalog snapshot:
//!
//! - **Grouping**: which environments belong to which group, from explicit
//!   members and glob patterns ([`resolve_groups`])
//! - **Visibility**: which links of a tree apply to an environment
//!   ([`is_visible`], [`filter_visible`])
//! - **Search**: which links match a text query or an id set, with their
//!   ancestors kept as context ([`search`], [`filter_by_ids`])
//! - **Selection**: which services and links an application's flat id set
//!   implies ([`resolve`], [`resolve_detailed`])
//!
//! Nothing here mutates its input, performs I/O or keeps state. Outputs are
//! freshly allocated and safe to memoize per (catalog version, parameters).
//!
//! # Example
//!
//! ```rust
//! use navdeck_model::Link;
//! use navdeck_resolve::filter_visible;
//!
//! let links = vec![Link::new("grafana", "Grafana", "https://grafana.example")
//!     .with_environments(["prod-1"])
//!     .with_child(Link::new("c1", "Overview", "https://grafana.example/overview"))];
//!
//! let visible = filter_visible(&links, "dev-1");
//! assert_eq!(visible[0].children[0].id, "c1");
//! ```

#![warn(unreachable_pub)]

pub mod columns;
pub mod glob;
pub mod grouping;
pub mod search;
pub mod selection;
pub mod tree;
pub mod visibility;

// Re-exports
pub use columns::{group_by_column, ColumnBucket};
pub use glob::{GlobError, GlobMatcher};
pub use grouping::{
    resolve_groups, resolve_groups_with, GroupOrigin, GroupingOptions, ResolvedGroup,
    OTHER_GROUP_ID,
};
pub use search::{contains_any, filter_by_ids, is_direct_match, matches, search};
pub use selection::{
    resolve, resolve_application, resolve_detailed, Identifier, Resolution, ResolvedService,
    SelectionIndex, SelectionKind,
};
pub use visibility::{filter_visible, has_visible_links, is_visible};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for resolving a catalog
    pub use crate::{
        filter_by_ids, filter_visible, is_visible, resolve, resolve_detailed, resolve_groups,
        search, GroupingOptions, Resolution, ResolvedGroup, ResolvedService, SelectionKind,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
