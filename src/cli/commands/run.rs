//! `run` command — drive a presentation sequence to its terminal state
//!
//! Loads the configuration, builds the catalog source, spawns a
//! controller, and renders each projection update until the sequence
//! settles (full reveal, empty display, or network error).

use std::path::Path;
use std::sync::Arc;

use tokio_stream::StreamExt;
use tracing::info;

use crate::catalog::create_catalog_source;
use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::{VitrineConfig, load_config};
use crate::controller::{DisplayState, PresentationController, Projection};
use crate::error::{ControllerError, Result, VitrineError};
use crate::observability::{EventEmitter, init_metrics};
use crate::store::StoreSnapshot;

/// Runs one presentation sequence.
///
/// # Errors
///
/// Returns configuration, catalog, or controller errors; a failed
/// fetch is not an error here (it renders as the degrade ladder).
pub async fn execute(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            info!("no configuration given; using defaults");
            VitrineConfig::default()
        }
    };

    let schedule = config.presentation.resolve()?;
    let source = create_catalog_source(&config.catalog)?;
    let snapshot = load_snapshot(args.store.as_deref())?;

    init_metrics(args.metrics_port)?;

    let events_path = args
        .events
        .clone()
        .or_else(|| config.logging.as_ref().and_then(|l| l.events.clone()));
    let emitter = match events_path {
        Some(path) => Arc::new(EventEmitter::from_file(&path)?),
        None => Arc::new(EventEmitter::noop()),
    };

    let controller = Arc::new(
        PresentationController::new(schedule, source).with_emitter(emitter),
    );
    let mut updates = controller.projection_stream();
    let handle = controller.start()?;

    while let Some(projection) = updates.next().await {
        render(&projection, &snapshot, args.format);
        if projection.is_settled() {
            controller.stop();
            break;
        }
    }

    handle
        .await
        .map_err(|e| VitrineError::Controller(ControllerError::DriverStopped(e.to_string())))?;

    summarize(&controller.projection(), args.format);
    Ok(())
}

fn load_snapshot(path: Option<&Path>) -> Result<StoreSnapshot> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&raw)?)
        }
        None => Ok(StoreSnapshot::default()),
    }
}

/// Renders one projection update.
fn render(projection: &Projection, snapshot: &StoreSnapshot, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(line) = serde_json::to_string(projection) {
                println!("{line}");
            }
        }
        OutputFormat::Human => {
            let display = match projection.display() {
                DisplayState::NetworkError => "network error",
                DisplayState::SoftWait => "please wait",
                DisplayState::Empty => "no products",
                DisplayState::Content => "content",
            };
            let progress = projection.total_items.map_or_else(
                || "-".to_string(),
                |total| format!("{}/{}", projection.exposed_items.len(), total),
            );
            println!(
                "[{}] {display} | revealed {progress} | cart badge {}",
                projection.phase,
                snapshot.badge_count(),
            );
        }
    }
}

/// Prints the terminal summary line.
fn summarize(projection: &Projection, format: OutputFormat) {
    if format == OutputFormat::Json {
        return;
    }
    match projection.display() {
        DisplayState::NetworkError => {
            println!("sequence ended: network error after slow timeout");
        }
        DisplayState::Empty => println!("sequence ended: catalog returned no products"),
        DisplayState::Content => println!(
            "sequence ended: {} products revealed",
            projection.exposed_items.len()
        ),
        DisplayState::SoftWait => println!("sequence ended while waiting"),
    }
}
