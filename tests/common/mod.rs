//! Shared helpers for integration tests.
#![allow(dead_code)] // each test binary uses a subset

use std::sync::Arc;
use std::time::Duration;

use vitrine::catalog::{CatalogSource, Price, Product, ScriptedCatalog};
use vitrine::config::Schedule;
use vitrine::controller::PresentationController;

/// Builds a minimal product.
#[must_use]
pub fn product(name: &str) -> Product {
    Product {
        id: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        description: String::new(),
        image: None,
        price: Price {
            cost: 1000,
            mrp: 1200,
            discount_percent: 16,
        },
        category: "Gemstones".to_string(),
        subcategory: String::new(),
        reviews: Vec::new(),
    }
}

/// Builds a product list.
#[must_use]
pub fn products(names: &[&str]) -> Vec<Product> {
    names.iter().map(|n| product(n)).collect()
}

/// Builds a controller over a scripted source with the default
/// (observed) schedule.
#[must_use]
pub fn controller(source: ScriptedCatalog) -> Arc<PresentationController> {
    controller_with(Schedule::default(), Arc::new(source))
}

/// Builds a controller over any source.
#[must_use]
pub fn controller_with(
    schedule: Schedule,
    source: Arc<dyn CatalogSource>,
) -> Arc<PresentationController> {
    Arc::new(PresentationController::new(schedule, source))
}

/// Lets the spawned driver task process pending wakeups.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Advances the paused clock, then lets the driver catch up.
pub async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}
