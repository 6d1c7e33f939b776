//! HTTP catalog source
//!
//! Fetches a JSON product list from a storefront backend endpoint.

use tracing::debug;

use crate::error::CatalogError;

use super::{CatalogSource, Product};

/// Catalog source backed by an HTTP endpoint returning a JSON array of
/// products.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalog {
    /// Creates a new HTTP catalog source for the given URL.
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        debug!(url = %self.url, "fetching catalog");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let products: Vec<Product> = response.json().await?;
        debug!(count = products.len(), "catalog fetched");
        Ok(products)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
