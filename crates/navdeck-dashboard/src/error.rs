//! Error types for the dashboard façade

use navdeck_model::ModelError;

/// Errors raised by [`crate::Dashboard`]
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Catalog failed to load or validate
    #[error(transparent)]
    Model(#[from] ModelError),

    /// No application with this id
    #[error("application not found: '{0}'")]
    ApplicationNotFound(String),

    /// No service with this id
    #[error("service not found: '{0}'")]
    ServiceNotFound(String),

    /// Bundle requested for an environment the application does not offer
    #[error("application '{application}' is not offered in environment '{environment}'")]
    EnvironmentNotOffered {
        application: String,
        environment: String,
    },

    /// Snapshot lock poisoned by a panicking writer
    #[error("catalog snapshot lock poisoned")]
    LockPoisoned,
}

impl DashboardError {
    /// Create environment-not-offered error
    pub fn not_offered(application: impl Into<String>, environment: impl Into<String>) -> Self {
        Self::EnvironmentNotOffered {
            application: application.into(),
            environment: environment.into(),
        }
    }

    /// Returns true if the error came from catalog validation or decoding
    #[must_use]
    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }
}

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use navdeck_model::IdOwner;

    #[test]
    fn messages_name_the_ids() {
        let err = DashboardError::not_offered("login", "qa-1");
        assert_eq!(
            err.to_string(),
            "application 'login' is not offered in environment 'qa-1'"
        );
        assert_eq!(
            DashboardError::ApplicationNotFound("x".into()).to_string(),
            "application not found: 'x'"
        );
    }

    #[test]
    fn model_errors_pass_through() {
        let err: DashboardError =
            ModelError::duplicate_id("dup", IdOwner::Service, IdOwner::Service).into();
        assert!(err.is_model());
        assert!(err.to_string().starts_with("duplicate id 'dup'"));
    }
}
