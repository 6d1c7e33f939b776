//! Read-only view projection
//!
//! The projection is recomputed from the machine state after every
//! event and published to the view, which consumes it reactively. The
//! four data-region states form a strict priority ladder: exactly one
//! of network-error, soft-wait, empty, or content is active at any
//! instant.

use serde::Serialize;

use crate::catalog::Product;

use super::machine::{ControllerState, FetchOutcome, Phase};

/// Snapshot of everything the view needs to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    /// Currently active phase.
    pub phase: Phase,

    /// The fetch failed and the slow timeout elapsed: show the
    /// terminal network-error display.
    pub network_error: bool,

    /// Interim "please wait" state: the fetch is unresolved, or failed
    /// within the soft-wait window.
    pub soft_wait: bool,

    /// The fetch succeeded with zero items.
    pub empty: bool,

    /// Items currently exposed by the incremental revealer, in
    /// original order.
    pub exposed_items: Vec<Product>,

    /// Total items fetched, once known. Lets a renderer show reveal
    /// progress without re-deriving it.
    pub total_items: Option<usize>,
}

/// Which single data-region display is active.
///
/// Derived from the projection flags by the priority ladder:
/// network-error over soft-wait over empty over content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    /// Terminal network-error display.
    NetworkError,
    /// Passive waiting visual.
    SoftWait,
    /// "No products" display.
    Empty,
    /// Normal content view.
    Content,
}

impl Projection {
    /// Computes the projection from the machine state.
    #[must_use]
    pub fn compute(state: &ControllerState) -> Self {
        let network_error =
            state.slow_elapsed() && matches!(state.outcome(), FetchOutcome::Failed(_));
        let soft_wait = !network_error
            && matches!(
                state.outcome(),
                FetchOutcome::Pending | FetchOutcome::Failed(_)
            );
        let empty = !network_error && !soft_wait && state.outcome().is_empty_success();

        Self {
            phase: state.phase(),
            network_error,
            soft_wait,
            empty,
            exposed_items: state.reveal().exposed_items().to_vec(),
            total_items: state.reveal().total(),
        }
    }

    /// The single active display, per the priority ladder.
    #[must_use]
    pub const fn display(&self) -> DisplayState {
        if self.network_error {
            DisplayState::NetworkError
        } else if self.soft_wait {
            DisplayState::SoftWait
        } else if self.empty {
            DisplayState::Empty
        } else {
            DisplayState::Content
        }
    }

    /// Whether the sequence has reached a terminal display: the
    /// network-error or empty display, or a fully revealed content
    /// view. Soft wait is not terminal — it can still escalate.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        if self.phase != Phase::ContentReady {
            return false;
        }
        match self.display() {
            DisplayState::NetworkError | DisplayState::Empty => true,
            DisplayState::SoftWait => false,
            DisplayState::Content => self
                .total_items
                .is_some_and(|total| self.exposed_items.len() == total),
        }
    }
}
