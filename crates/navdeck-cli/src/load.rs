//! Catalog file loading

use anyhow::{Context, Result};
use navdeck_model::Catalog;
use std::path::Path;

/// Encoding of a catalog file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoding {
    Yaml,
    Json,
}

impl Encoding {
    /// Pick the encoding from the file extension, defaulting to YAML
    pub(crate) fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Read and decode a catalog file
pub(crate) fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;

    let catalog = match Encoding::for_path(path) {
        Encoding::Yaml => Catalog::from_yaml(&text),
        Encoding::Json => Catalog::from_json(&text),
    }
    .with_context(|| format!("failed to parse catalog {}", path.display()))?;

    tracing::debug!(
        "Read catalog {} ({} services, {} environments)",
        path.display(),
        catalog.services.len(),
        catalog.environments.len()
    );
    Ok(catalog)
}
