//! Dashboard configuration

use navdeck_resolve::GroupingOptions;
use serde::{Deserialize, Serialize};

/// Knobs for [`crate::Dashboard`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Maximum entries per memo table
    pub cache_capacity: u64,

    /// Reject catalogs that fail validation (id collisions, bad parents)
    pub strict_ids: bool,

    /// Display name of the leftover environment group
    pub other_group_name: String,
}

impl DashboardConfig {
    /// Create config with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache_capacity: 1024,
            strict_ids: true,
            other_group_name: "Other".to_string(),
        }
    }

    /// Set memo table capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Enable or disable validation on install
    #[inline]
    #[must_use]
    pub fn with_strict_ids(mut self, strict: bool) -> Self {
        self.strict_ids = strict;
        self
    }

    /// Rename the leftover environment group
    #[inline]
    #[must_use]
    pub fn with_other_group_name(mut self, name: impl Into<String>) -> Self {
        self.other_group_name = name.into();
        self
    }

    /// Grouping options derived from this config
    #[must_use]
    pub fn grouping_options(&self) -> GroupingOptions {
        GroupingOptions {
            other_name: self.other_group_name.clone(),
            ..GroupingOptions::default()
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new()
    }
}
