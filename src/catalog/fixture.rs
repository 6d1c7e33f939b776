//! File-backed and scripted catalog sources
//!
//! `FileCatalog` loads products from a local JSON or YAML file.
//! `ScriptedCatalog` resolves after a configurable delay with a
//! configurable outcome; demos and tests use it to exercise the slow,
//! empty, and failed fetch paths without a network.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CatalogError;

use super::{CatalogSource, Product};

/// Loads a product list from a JSON or YAML file.
///
/// The format is chosen by extension: `.json` parses as JSON,
/// everything else as YAML.
///
/// # Errors
///
/// Returns `CatalogError::Io` if the file cannot be read or
/// `CatalogError::Decode` if it does not contain a product list.
pub fn load_products(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let raw = std::fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw).map_err(|e| CatalogError::Decode(e.to_string()))
    } else {
        serde_yaml::from_str(&raw).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

// ============================================================================
// FileCatalog
// ============================================================================

/// Catalog source backed by a local product file, read at fetch time.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// Creates a new file catalog source.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait::async_trait]
impl CatalogSource for FileCatalog {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        load_products(&self.path)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

// ============================================================================
// ScriptedCatalog
// ============================================================================

/// How a [`ScriptedCatalog`] resolves.
#[derive(Debug, Clone)]
pub enum ScriptedResolution {
    /// Resolve with the given products.
    Items(Vec<Product>),
    /// Resolve with zero items.
    Empty,
    /// Resolve with a failure.
    Fail(String),
}

/// Catalog source that resolves after an optional delay with a
/// predetermined outcome.
#[derive(Debug, Clone)]
pub struct ScriptedCatalog {
    delay: Option<Duration>,
    resolution: ScriptedResolution,
}

impl ScriptedCatalog {
    /// Creates a new scripted catalog source.
    #[must_use]
    pub const fn new(delay: Option<Duration>, resolution: ScriptedResolution) -> Self {
        Self { delay, resolution }
    }

    /// A source that resolves immediately with the given products.
    #[must_use]
    pub const fn succeeding(products: Vec<Product>) -> Self {
        Self::new(None, ScriptedResolution::Items(products))
    }

    /// A source that resolves immediately with zero items.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(None, ScriptedResolution::Empty)
    }

    /// A source that fails immediately.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(None, ScriptedResolution::Fail(reason.into()))
    }
}

#[async_trait::async_trait]
impl CatalogSource for ScriptedCatalog {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.resolution {
            ScriptedResolution::Items(products) => Ok(products.clone()),
            ScriptedResolution::Empty => Ok(Vec::new()),
            ScriptedResolution::Fail(reason) => {
                Err(CatalogError::Unavailable(reason.clone()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
