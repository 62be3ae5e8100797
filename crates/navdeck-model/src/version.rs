//! Content-addressed catalog versions
//!
//! Provides [`CatalogVersion`], a Blake3 hash over the canonical JSON
//! encoding of a catalog. Equal documents have equal versions, so the
//! version is a safe memo key for anything derived from the catalog.

use crate::catalog::Catalog;
use crate::error::Result;
use std::fmt::{self, Display, Formatter};

/// A 32-byte Blake3 hash of a catalog document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CatalogVersion([u8; 32]);

impl CatalogVersion {
    /// Create from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a catalog
    ///
    /// # Errors
    /// Returns error if the catalog cannot be encoded as JSON
    pub fn of(catalog: &Catalog) -> Result<Self> {
        let canonical = serde_json::to_vec(catalog)?;
        Ok(Self::compute(&canonical))
    }

    /// Hash arbitrary bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for CatalogVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
