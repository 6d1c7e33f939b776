//! Configuration loading and validation
//!
//! Reads a YAML configuration file, deserializes it, and runs a
//! validation pass. Validation errors are collected rather than
//! reported one at a time.

use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, Severity, ValidationIssue};

use super::schema::{CatalogConfig, ScriptedOutcome, VitrineConfig, parse_duration};

/// Loads and validates a configuration file.
///
/// # Errors
///
/// - `ConfigError::MissingFile` if the path does not exist
/// - `ConfigError::ParseError` if the YAML is malformed
/// - `ConfigError::ValidationError` if validation finds any
///   error-severity issues
pub fn load_config(path: &Path) -> Result<VitrineConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
    })?;

    let config: VitrineConfig =
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let issues = validate(&config);
    for issue in issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
    {
        tracing::warn!(%issue, "configuration warning");
    }

    let errors: Vec<ValidationIssue> = issues
        .into_iter()
        .filter(|i| i.severity == Severity::Error)
        .collect();
    if !errors.is_empty() {
        return Err(ConfigError::ValidationError {
            path: path.display().to_string(),
            errors,
        });
    }

    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Validates a configuration, returning all issues found.
///
/// Error-severity issues make the configuration unusable; warnings are
/// logged and otherwise ignored.
#[must_use]
pub fn validate(config: &VitrineConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    validate_timings(config, &mut issues);
    validate_catalog(&config.catalog, &mut issues);

    issues
}

fn validate_timings(config: &VitrineConfig, issues: &mut Vec<ValidationIssue>) {
    let fields = [
        ("presentation.initial_loading", &config.presentation.initial_loading),
        ("presentation.progress_animation", &config.presentation.progress_animation),
        (
            "presentation.promotional_animation",
            &config.presentation.promotional_animation,
        ),
        ("presentation.reveal_interval", &config.presentation.reveal_interval),
        ("presentation.slow_timeout", &config.presentation.slow_timeout),
    ];

    for (path, value) in fields {
        if let Err(e) = parse_duration(value) {
            issues.push(ValidationIssue {
                path: path.to_string(),
                message: e.to_string(),
                severity: Severity::Error,
            });
        }
    }

    // A zero reveal interval would expose everything in one burst,
    // defeating the incremental reveal.
    if parse_duration(&config.presentation.reveal_interval)
        .is_ok_and(|d| d.is_zero())
    {
        issues.push(ValidationIssue {
            path: "presentation.reveal_interval".to_string(),
            message: "must be greater than zero".to_string(),
            severity: Severity::Error,
        });
    }

    // A zero slow timeout escalates every failure immediately, skipping
    // the soft-wait tier.
    if parse_duration(&config.presentation.slow_timeout).is_ok_and(|d| d.is_zero()) {
        issues.push(ValidationIssue {
            path: "presentation.slow_timeout".to_string(),
            message: "zero timeout disables the soft-wait window".to_string(),
            severity: Severity::Warning,
        });
    }
}

fn validate_catalog(catalog: &CatalogConfig, issues: &mut Vec<ValidationIssue>) {
    match catalog {
        CatalogConfig::Http { url } => {
            if url.is_empty() {
                issues.push(ValidationIssue {
                    path: "catalog.url".to_string(),
                    message: "url is empty".to_string(),
                    severity: Severity::Error,
                });
            } else if !url.starts_with("http://") && !url.starts_with("https://") {
                issues.push(ValidationIssue {
                    path: "catalog.url".to_string(),
                    message: format!("'{url}' is not an http(s) url"),
                    severity: Severity::Error,
                });
            }
        }
        CatalogConfig::File { path } => {
            if path.as_os_str().is_empty() {
                issues.push(ValidationIssue {
                    path: "catalog.path".to_string(),
                    message: "path is empty".to_string(),
                    severity: Severity::Error,
                });
            }
        }
        CatalogConfig::Scripted {
            delay,
            outcome,
            items,
        } => {
            if let Some(delay) = delay {
                if let Err(e) = parse_duration(delay) {
                    issues.push(ValidationIssue {
                        path: "catalog.delay".to_string(),
                        message: e.to_string(),
                        severity: Severity::Error,
                    });
                }
            }
            if *outcome == ScriptedOutcome::Succeed && items.is_none() {
                issues.push(ValidationIssue {
                    path: "catalog.items".to_string(),
                    message: "outcome 'succeed' requires an items file".to_string(),
                    severity: Severity::Error,
                });
            }
            if *outcome != ScriptedOutcome::Succeed && items.is_some() {
                issues.push(ValidationIssue {
                    path: "catalog.items".to_string(),
                    message: "items file is ignored unless outcome is 'succeed'".to_string(),
                    severity: Severity::Warning,
                });
            }
        }
    }
}
