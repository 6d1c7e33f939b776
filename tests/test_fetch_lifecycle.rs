//! Fetch lifecycle: issue-once, two-tier failure degrade, empty result.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{advance, controller, controller_with, products, settle};
use vitrine::catalog::{CatalogSource, Product, ScriptedCatalog};
use vitrine::config::Schedule;
use vitrine::controller::{DisplayState, Phase};
use vitrine::error::CatalogError;

/// Source that counts how many times `fetch` is invoked.
struct CountingCatalog {
    calls: AtomicUsize,
    products: Vec<Product>,
}

impl CountingCatalog {
    fn new(products: Vec<Product>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            products,
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for CountingCatalog {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.products.clone())
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

#[tokio::test(start_paused = true)]
async fn fetch_is_issued_exactly_once_per_lifetime() {
    let source = Arc::new(CountingCatalog::new(products(&["Ruby", "Pearl"])));
    let controller = controller_with(Schedule::default(), Arc::clone(&source) as _);
    let handle = controller.start().unwrap();
    settle().await;

    // Before the promotional animation the fetch must not be issued.
    advance(Duration::from_secs(12)).await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);

    // Run far past the whole sequence.
    advance(Duration::from_secs(120)).await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    controller.stop();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failure_degrades_in_two_tiers() {
    let controller = controller(ScriptedCatalog::failing("connection refused"));
    let handle = controller.start().unwrap();
    settle().await;

    // Failure observed at t=13; soft wait, not a hard error.
    advance(Duration::from_secs(13)).await;
    let projection = controller.projection();
    assert!(projection.soft_wait);
    assert!(!projection.network_error);

    // Still the passive visual at t=52.9, just inside the window.
    advance(Duration::from_millis(39_900)).await;
    assert_eq!(controller.projection().display(), DisplayState::SoftWait);

    // t=53: escalated, and permanent for this lifetime.
    advance(Duration::from_millis(100)).await;
    assert_eq!(controller.projection().display(), DisplayState::NetworkError);

    advance(Duration::from_secs(600)).await;
    let projection = controller.projection();
    assert_eq!(projection.display(), DisplayState::NetworkError);
    assert!(projection.is_settled());

    controller.stop();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn empty_result_shows_empty_display_and_never_ticks() {
    let controller = controller(ScriptedCatalog::empty());
    let handle = controller.start().unwrap();
    settle().await;

    advance(Duration::from_secs(21)).await;
    let projection = controller.projection();
    assert_eq!(projection.phase, Phase::ContentReady);
    assert_eq!(projection.display(), DisplayState::Empty);
    assert!(projection.empty);
    assert_eq!(projection.total_items, Some(0));

    // The revealer stays dormant no matter how long we wait.
    advance(Duration::from_secs(300)).await;
    assert!(controller.projection().exposed_items.is_empty());

    controller.stop();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn display_ladder_is_exclusive() {
    let controller = controller(ScriptedCatalog::failing("down"));
    let mut rx = controller.subscribe();
    let handle = controller.start().unwrap();
    settle().await;

    // Sample the projection across the whole degrade timeline; at
    // every observed instant exactly one display state is active.
    for step in [5u64, 8, 8, 20, 20, 20] {
        advance(Duration::from_secs(step)).await;
        let projection = rx.borrow_and_update().clone();
        let active = [
            projection.network_error,
            projection.soft_wait,
            projection.empty,
        ]
        .iter()
        .filter(|&&b| b)
        .count();
        assert!(active <= 1, "overlapping display flags: {projection:?}");
    }

    controller.stop();
    handle.await.unwrap();
}
