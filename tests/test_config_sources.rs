//! Configuration fixtures drive a real sequence end to end.

mod common;

use std::path::PathBuf;
use std::time::Duration;

use common::{advance, controller_with, settle};
use vitrine::catalog::{FileCatalog, create_catalog_source};
use vitrine::config::load_config;
use vitrine::controller::Phase;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[tokio::test(start_paused = true)]
async fn fixture_config_runs_to_full_reveal() {
    let config = load_config(&fixture_path("vitrine.yaml")).unwrap();
    let schedule = config.presentation.resolve().unwrap();
    let source = create_catalog_source(&config.catalog).unwrap();

    let controller = controller_with(schedule, source);
    let handle = controller.start().unwrap();
    settle().await;

    // 21s of phases plus three 500ms ticks.
    advance(Duration::from_secs(21)).await;
    assert_eq!(controller.projection().phase, Phase::ContentReady);

    advance(Duration::from_millis(1500)).await;
    let projection = controller.projection();
    assert!(projection.is_settled());

    let names: Vec<&str> = projection
        .exposed_items
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Blue Sapphire Ring", "Pearl Pendant", "Emerald Stud Earrings"]
    );

    controller.stop();
    handle.await.unwrap();
}

#[tokio::test]
async fn file_catalog_reads_the_product_fixture() {
    let source = FileCatalog::new(fixture_path("products.json"));
    let products = vitrine::catalog::CatalogSource::fetch(&source).await.unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0].price.discount_percent, 19);
    assert_eq!(products[0].reviews.len(), 1);
    assert_eq!(products[2].category, "Earrings");
}
