//! Environment groups
//!
//! An [`EnvironmentGroup`] declares membership two ways: a glob `pattern`
//! matched against catalog environments, and an explicit member list.
//! Resolution into a partition lives in the resolver crate.

use crate::Environment;
use serde::{Deserialize, Serialize};

/// Named bucket of environments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentGroup {
    /// Identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Icon name
    #[serde(default)]
    pub icon: String,

    /// Shell-style glob (`*`, `?`) matched against whole environment names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Explicit members
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl EnvironmentGroup {
    /// Create group with no pattern and no members
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: String::new(),
            pattern: None,
            environments: Vec::new(),
        }
    }

    /// With icon
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// With glob pattern
    #[inline]
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// With explicit members
    #[must_use]
    pub fn with_environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environments = environments.into_iter().map(Into::into).collect();
        self
    }

    /// Pattern, if set and not blank
    #[must_use]
    pub fn active_pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_pattern_is_inactive() {
        let group = EnvironmentGroup::new("g", "G").with_pattern("  ");
        assert_eq!(group.active_pattern(), None);

        let group = EnvironmentGroup::new("g", "G").with_pattern("prod-*");
        assert_eq!(group.active_pattern(), Some("prod-*"));
    }
}
