//! Configuration schema types
//!
//! This module defines the configuration types for `vitrine` runs.
//! These types are deserialized from YAML configuration files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a `vitrine` presentation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VitrineConfig {
    /// Phase and reveal timings.
    #[serde(default)]
    pub presentation: PresentationTimings,

    /// Catalog source to fetch products from.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ============================================================================
// Presentation Timings
// ============================================================================

/// Durations driving the staged-reveal sequence.
///
/// All fields are human-readable duration strings (`"500ms"`, `"8s"`,
/// `"5m"`, `"1h"`). Defaults reproduce the observed storefront timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PresentationTimings {
    /// How long the initial loader is shown.
    #[serde(default = "default_initial_loading")]
    pub initial_loading: String,

    /// How long the progress indicator is shown.
    #[serde(default = "default_progress_animation")]
    pub progress_animation: String,

    /// How long the promotional animation plays. The catalog fetch is
    /// issued when this phase is entered.
    #[serde(default = "default_promotional_animation")]
    pub promotional_animation: String,

    /// Cadence of the incremental reveal (one item per tick).
    #[serde(default = "default_reveal_interval")]
    pub reveal_interval: String,

    /// How long a failed fetch is absorbed as a soft wait before
    /// escalating to a network-error display.
    #[serde(default = "default_slow_timeout")]
    pub slow_timeout: String,
}

fn default_initial_loading() -> String {
    "5s".to_string()
}

fn default_progress_animation() -> String {
    "8s".to_string()
}

fn default_promotional_animation() -> String {
    "8s".to_string()
}

fn default_reveal_interval() -> String {
    "500ms".to_string()
}

fn default_slow_timeout() -> String {
    "40s".to_string()
}

impl Default for PresentationTimings {
    fn default() -> Self {
        Self {
            initial_loading: default_initial_loading(),
            progress_animation: default_progress_animation(),
            promotional_animation: default_promotional_animation(),
            reveal_interval: default_reveal_interval(),
            slow_timeout: default_slow_timeout(),
        }
    }
}

impl PresentationTimings {
    /// Parses every duration field into a concrete [`Schedule`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDuration` for the first field that
    /// fails to parse.
    pub fn resolve(&self) -> Result<Schedule, ConfigError> {
        Ok(Schedule {
            initial_loading: parse_duration(&self.initial_loading)?,
            progress_animation: parse_duration(&self.progress_animation)?,
            promotional_animation: parse_duration(&self.promotional_animation)?,
            reveal_interval: parse_duration(&self.reveal_interval)?,
            slow_timeout: parse_duration(&self.slow_timeout)?,
        })
    }
}

/// Concrete phase/reveal durations, resolved from [`PresentationTimings`].
///
/// This is what the controller consumes; it never sees raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Duration of the `InitialLoading` phase.
    pub initial_loading: Duration,
    /// Duration of the `ProgressAnimation` phase.
    pub progress_animation: Duration,
    /// Duration of the `PromotionalAnimation` phase.
    pub promotional_animation: Duration,
    /// Reveal tick cadence.
    pub reveal_interval: Duration,
    /// Soft-wait window before a failure escalates.
    pub slow_timeout: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        // Defaults always parse.
        PresentationTimings::default()
            .resolve()
            .expect("default timings are valid")
    }
}

// ============================================================================
// Catalog Source
// ============================================================================

/// Catalog source selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogConfig {
    /// Fetch a JSON product list from an HTTP endpoint.
    Http {
        /// Endpoint URL returning a JSON array of products.
        url: String,
    },

    /// Load a product list from a local JSON or YAML file.
    File {
        /// Path to the product file.
        path: PathBuf,
    },

    /// Scripted source with a configurable delay and outcome, for
    /// demos and tests.
    Scripted {
        /// Artificial resolution delay (duration string).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delay: Option<String>,

        /// How the fetch resolves.
        #[serde(default)]
        outcome: ScriptedOutcome,

        /// Product file to succeed with (required when `outcome` is
        /// `succeed`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<PathBuf>,
    },
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::Scripted {
            delay: None,
            outcome: ScriptedOutcome::Empty,
            items: None,
        }
    }
}

/// Resolution of a scripted catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedOutcome {
    /// Resolve with the products from `items`.
    Succeed,
    /// Resolve with zero items.
    #[default]
    Empty,
    /// Resolve with a failure.
    Fail,
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// File to append the JSONL event stream to. When unset, events go
    /// to stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<PathBuf>,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debug level
    Debug,
    /// Info level
    #[default]
    Info,
    /// Warning level
    Warn,
    /// Error level
    Error,
}

// ============================================================================
// Duration Parsing
// ============================================================================

/// Parses a duration string like `"500ms"`, `"30s"`, `"5m"`, `"1h"`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDuration` if the format is invalid.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();

    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };

    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_millis(n));
    }

    if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_secs(n * 3600));
    }

    if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_secs(n * 60));
    }

    if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.trim().parse().map_err(|_| invalid())?;
        return Ok(Duration::from_secs(n));
    }

    Err(invalid())
}

// ============================================================================
// Tests
// ============================================================================
