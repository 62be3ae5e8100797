//! Display columns
//!
//! A [`Column`] is a pure display category referenced by `Link::column_id`.
//! It has no effect on resolution.

use serde::{Deserialize, Serialize};

/// Display category for links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Identifier referenced by links
    pub id: String,

    /// Heading shown above the column
    pub title: String,

    /// Category tag (e.g. `dashboards`, `logs`, `repos`)
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Icon name
    #[serde(default)]
    pub icon: String,
}

impl Column {
    /// Create column with empty kind and icon
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: String::new(),
            icon: String::new(),
        }
    }

    /// With category tag
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// With icon
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}
