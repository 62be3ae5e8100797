//! Applications
//!
//! An [`Application`] bundles services and individual links under one name.
//! `service_ids` shares one namespace between service ids and link ids at
//! any depth; entries that no longer resolve are tolerated.

use crate::Environment;
use serde::{Deserialize, Serialize};

/// Named bundle of service and link identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Selected service ids and/or link ids
    #[serde(default)]
    pub service_ids: Vec<String>,

    /// Environments the bundle is offered in (`None` = all catalog environments)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environments: Option<Vec<Environment>>,
}

impl Application {
    /// Create application with an empty selection
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            service_ids: Vec::new(),
            environments: None,
        }
    }

    /// With selected ids
    #[must_use]
    pub fn with_selection<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// With offered environments
    #[must_use]
    pub fn with_environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environments = Some(environments.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if the bundle is offered in `env`
    #[must_use]
    pub fn offers(&self, env: &str) -> bool {
        self.environments
            .as_ref()
            .map_or(true, |envs| envs.iter().any(|e| e == env))
    }

    /// Returns true if `id` is part of the selection
    #[must_use]
    pub fn selects(&self, id: &str) -> bool {
        self.service_ids.iter().any(|selected| selected == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offers_everywhere_without_restriction() {
        let app = Application::new("checkout", "Checkout");
        assert!(app.offers("prod-1"));

        let app = app.with_environments(["prod-1"]);
        assert!(app.offers("prod-1"));
        assert!(!app.offers("dev-1"));
    }

    #[test]
    fn selects_matches_exact_ids() {
        let app = Application::new("checkout", "Checkout").with_selection(["auth", "pay-logs"]);
        assert!(app.selects("auth"));
        assert!(!app.selects("pay"));
    }
}
