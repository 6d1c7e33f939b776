//! Configuration for `vitrine`.
//!
//! YAML configuration covering presentation timings, the catalog
//! source, and logging options.

pub mod loader;
pub mod schema;

pub use loader::{load_config, validate};
pub use schema::{CatalogConfig, PresentationTimings, Schedule, VitrineConfig, parse_duration};
