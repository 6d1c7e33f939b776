//! Metrics collection for `vitrine`.
//!
//! Provides Prometheus-compatible metrics and typed convenience
//! functions for recording measurements during a presentation sequence.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::VitrineError;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without
/// an HTTP endpoint (metrics are recorded internally and can be read
/// programmatically).
///
/// # Errors
///
/// Returns `VitrineError::Io` if the recorder or HTTP listener cannot
/// be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), VitrineError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| VitrineError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "vitrine_phase_transitions_total",
        "Total number of phase transitions"
    );
    describe_gauge!(
        "vitrine_current_phase",
        "Index of the currently active phase"
    );
    describe_counter!(
        "vitrine_fetch_outcomes_total",
        "Catalog fetch resolutions by outcome"
    );
    describe_counter!(
        "vitrine_items_revealed_total",
        "Total number of items exposed to the view"
    );
    describe_counter!(
        "vitrine_slow_timeouts_total",
        "Times the slow timeout escalated a failure to a network error"
    );
}

/// Records a phase transition into the named phase.
pub fn record_phase_transition(phase: &'static str, phase_index: usize) {
    counter!("vitrine_phase_transitions_total", "phase" => phase).increment(1);
    #[allow(clippy::cast_precision_loss)]
    gauge!("vitrine_current_phase").set(phase_index as f64);
}

/// Records a catalog fetch resolution.
///
/// `outcome` is one of `"succeeded"`, `"empty"`, or `"failed"`.
pub fn record_fetch_outcome(outcome: &'static str) {
    counter!("vitrine_fetch_outcomes_total", "outcome" => outcome).increment(1);
}

/// Records one item exposed to the view.
pub fn record_item_revealed() {
    counter!("vitrine_items_revealed_total").increment(1);
}

/// Records a slow-timeout escalation.
pub fn record_slow_timeout() {
    counter!("vitrine_slow_timeouts_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_metrics_is_idempotent() {
        // First call installs (or fails if another test won the race —
        // both paths leave the guard set); second call must be a no-op Ok.
        let _ = init_metrics(None);
        assert!(init_metrics(None).is_ok());
    }

    #[test]
    fn record_helpers_do_not_panic_without_recorder() {
        // The metrics facade no-ops when no recorder is installed.
        record_phase_transition("initial_loading", 0);
        record_fetch_outcome("succeeded");
        record_item_revealed();
        record_slow_timeout();
    }
}
