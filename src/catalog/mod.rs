//! Catalog fetch collaborator
//!
//! The product model and the [`CatalogSource`] trait the controller
//! fetches through. The controller invokes a source's `fetch` exactly
//! once per lifetime and never retries, polls, or cancels it; a failed
//! fetch folds into the presentation's degrade ladder instead.

pub mod fixture;
pub mod http;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::config::schema::ScriptedOutcome;
use crate::error::{CatalogError, VitrineError};

pub use fixture::{FileCatalog, ScriptedCatalog, ScriptedResolution};
pub use http::HttpCatalog;

// ============================================================================
// Product Model
// ============================================================================

/// A storefront product as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Long-form description.
    #[serde(default)]
    pub description: String,

    /// Image URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Pricing block.
    pub price: Price,

    /// Top-level category.
    #[serde(default)]
    pub category: String,

    /// Subcategory within the category.
    #[serde(default)]
    pub subcategory: String,

    /// Customer reviews.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
}

/// Product pricing: selling cost, list price, and discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Selling price.
    pub cost: u64,

    /// Maximum retail price (struck through in the view).
    pub mrp: u64,

    /// Discount percentage off the MRP.
    #[serde(default)]
    pub discount_percent: u8,
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Reviewer display name.
    pub reviewer: String,

    /// Star rating, 1–5.
    pub rating: u8,

    /// Review text.
    #[serde(default)]
    pub comment: String,

    /// When the review was posted.
    pub date: DateTime<Utc>,
}

// ============================================================================
// CatalogSource trait
// ============================================================================

/// A source of catalog products.
///
/// `fetch` is issued exactly once per controller lifetime. Sources are
/// otherwise stateless from the controller's perspective.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches the full product list.
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

// ============================================================================
// Factory
// ============================================================================

/// Creates a catalog source from a configuration.
///
/// File-backed sources read their product file eagerly so configuration
/// problems surface before the sequence starts.
///
/// # Errors
///
/// Returns a configuration or I/O error if a scripted delay fails to
/// parse or a product file cannot be read.
pub fn create_catalog_source(
    config: &CatalogConfig,
) -> Result<Arc<dyn CatalogSource>, VitrineError> {
    match config {
        CatalogConfig::Http { url } => Ok(Arc::new(HttpCatalog::new(url.clone()))),
        CatalogConfig::File { path } => Ok(Arc::new(FileCatalog::new(path.clone()))),
        CatalogConfig::Scripted {
            delay,
            outcome,
            items,
        } => {
            let delay = delay
                .as_deref()
                .map(crate::config::parse_duration)
                .transpose()?;
            let resolution = match outcome {
                ScriptedOutcome::Empty => ScriptedResolution::Empty,
                ScriptedOutcome::Fail => {
                    ScriptedResolution::Fail("scripted failure".to_string())
                }
                ScriptedOutcome::Succeed => {
                    let path = items.as_ref().ok_or_else(|| {
                        crate::error::ConfigError::InvalidValue {
                            field: "catalog.items".to_string(),
                            value: "<unset>".to_string(),
                            expected: "a product file path".to_string(),
                        }
                    })?;
                    ScriptedResolution::Items(fixture::load_products(path)?)
                }
            };
            Ok(Arc::new(ScriptedCatalog::new(delay, resolution)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_from_camel_case() {
        let json = r#"{
            "id": "p-1",
            "name": "Blue Sapphire Ring",
            "description": "Certified neelam set in silver",
            "image": "https://shop.example/img/p-1.png",
            "price": { "cost": 14500, "mrp": 18000, "discountPercent": 19 },
            "category": "Rings",
            "subcategory": "Sapphire",
            "reviews": [
                {
                    "reviewer": "Asha",
                    "rating": 5,
                    "comment": "Beautiful stone",
                    "date": "2026-01-12T09:30:00Z"
                }
            ]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Blue Sapphire Ring");
        assert_eq!(product.price.discount_percent, 19);
        assert_eq!(product.reviews.len(), 1);
        assert_eq!(product.reviews[0].rating, 5);
    }

    #[test]
    fn test_product_optional_fields_default() {
        let json = r#"{
            "id": "p-2",
            "name": "Pearl Pendant",
            "price": { "cost": 3200, "mrp": 3200 }
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_empty());
        assert!(product.image.is_none());
        assert!(product.reviews.is_empty());
        assert_eq!(product.price.discount_percent, 0);
    }

    #[test]
    fn test_factory_scripted_empty() {
        let source = create_catalog_source(&CatalogConfig::default()).unwrap();
        assert_eq!(source.name(), "scripted");
    }

    #[test]
    fn test_factory_scripted_bad_delay() {
        let config = CatalogConfig::Scripted {
            delay: Some("soon".to_string()),
            outcome: ScriptedOutcome::Empty,
            items: None,
        };
        assert!(create_catalog_source(&config).is_err());
    }

    #[test]
    fn test_factory_scripted_succeed_without_items() {
        let config = CatalogConfig::Scripted {
            delay: None,
            outcome: ScriptedOutcome::Succeed,
            items: None,
        };
        assert!(create_catalog_source(&config).is_err());
    }

    #[test]
    fn test_factory_http() {
        let config = CatalogConfig::Http {
            url: "https://shop.example/api/products".to_string(),
        };
        let source = create_catalog_source(&config).unwrap();
        assert_eq!(source.name(), "http");
    }
}
