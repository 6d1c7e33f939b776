//! Staged presentation controller
//!
//! The landing-page orchestrator: a four-phase sequencer, a fetch
//! lifecycle tracker, and an incremental revealer, split into a pure
//! state machine and a timer-scheduling shell.
//!
//! # Architecture
//!
//! - [`machine`] — pure transition core: `(State, Event) -> Effects`,
//!   no clock or I/O, unit-testable without wall-clock delays
//! - [`projection`] — read-only view snapshot with the strict display
//!   priority ladder
//! - [`driver`] — the shell: owns the tokio timers and the in-flight
//!   fetch, applies effects, publishes projections, and tears
//!   everything down on `stop`

pub mod driver;
pub mod machine;
pub mod projection;

pub use driver::PresentationController;
pub use machine::{ControllerState, Effect, Event, FetchOutcome, Phase, RevealState};
pub use projection::{DisplayState, Projection};
