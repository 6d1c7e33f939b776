//! Timer and effect shell for the presentation controller
//!
//! [`PresentationController`] owns one driver task per lifetime. The
//! task holds the machine state, arms one-shot timers for the
//! machine's effects, issues the catalog fetch exactly once, and
//! publishes a fresh projection after every event. `stop` cancels the
//! task; every pending timer and the projection freeze with it.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{CatalogSource, Product};
use crate::config::Schedule;
use crate::error::{CatalogError, ControllerError};
use crate::observability::EventEmitter;
use crate::observability::events;
use crate::observability::metrics;

use super::machine::{ControllerState, Effect, Event, Phase};
use super::projection::Projection;

/// What woke the driver loop.
enum Wakeup {
    Cancelled,
    PhaseTimer,
    SlowTimer,
    RevealTick,
    FetchSettled(Result<Vec<Product>, CatalogError>),
}

/// Drives one landing-page presentation lifetime.
///
/// `start` spawns the driver task; `stop` tears it down. Both sides of
/// the pairing belong to the caller, 1:1 — a stopped controller is not
/// restartable, matching one page mount per lifetime.
pub struct PresentationController {
    session_id: Uuid,
    schedule: Schedule,
    source: Arc<dyn CatalogSource>,
    emitter: Arc<EventEmitter>,
    cancel: CancellationToken,
    started: AtomicBool,
    projection_tx: watch::Sender<Projection>,
}

impl PresentationController {
    /// Creates a controller for one lifetime.
    #[must_use]
    pub fn new(schedule: Schedule, source: Arc<dyn CatalogSource>) -> Self {
        let initial = Projection::compute(&ControllerState::new(schedule));
        let (projection_tx, _) = watch::channel(initial);
        Self {
            session_id: Uuid::new_v4(),
            schedule,
            source,
            emitter: Arc::new(EventEmitter::noop()),
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
            projection_tx,
        }
    }

    /// Attaches a structured event emitter.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<EventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Session id for this lifetime, carried on every emitted event.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current projection snapshot.
    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection_tx.borrow().clone()
    }

    /// Subscribes to projection updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Projection> {
        self.projection_tx.subscribe()
    }

    /// Projection updates as a stream, for reactive consumers.
    #[must_use]
    pub fn projection_stream(&self) -> WatchStream<Projection> {
        WatchStream::new(self.subscribe())
    }

    /// Begins the sequence, spawning the driver task.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::AlreadyStarted` if `start` was already
    /// called on this controller. Double-scheduling the phase timers is
    /// never permitted.
    pub fn start(self: &Arc<Self>) -> Result<JoinHandle<()>, ControllerError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ControllerError::AlreadyStarted);
        }
        info!(session_id = %self.session_id, source = self.source.name(), "controller starting");
        let controller = Arc::clone(self);
        Ok(tokio::spawn(async move { controller.drive().await }))
    }

    /// Tears the lifetime down: every pending timer is cancelled and
    /// the projection freezes. Idempotent — safe to call repeatedly or
    /// when no timer is pending.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether `stop` has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn drive(self: Arc<Self>) {
        let mut state = ControllerState::new(self.schedule);

        self.emitter.emit(events::Event::ControllerStarted {
            timestamp: Utc::now(),
            session_id: self.session_id,
        });
        self.note_phase(state.phase());

        // One slot per timer kind: at most one phase timer is live at
        // a time, and each slot holds a one-shot sleep.
        let mut phase_timer: Option<(Phase, Pin<Box<Sleep>>)> = None;
        let mut slow_timer: Option<Pin<Box<Sleep>>> = None;
        let mut reveal_timer: Option<Pin<Box<Sleep>>> = None;
        let mut fetch: Option<BoxFuture<'static, Result<Vec<Product>, CatalogError>>> = None;

        let mut effects = state.apply(Event::Start);

        loop {
            for effect in effects.drain(..) {
                match effect {
                    Effect::SchedulePhaseTimer { phase, after } => {
                        phase_timer = Some((phase, Box::pin(tokio::time::sleep(after))));
                    }
                    Effect::IssueFetch => {
                        let source = Arc::clone(&self.source);
                        fetch = Some(Box::pin(async move { source.fetch().await }));
                        debug!(source = self.source.name(), "catalog fetch issued");
                        self.emitter.emit(events::Event::FetchIssued {
                            timestamp: Utc::now(),
                            session_id: self.session_id,
                        });
                    }
                    Effect::ScheduleSlowTimer { after } => {
                        slow_timer = Some(Box::pin(tokio::time::sleep(after)));
                    }
                    Effect::ScheduleRevealTick { after } => {
                        reveal_timer = Some(Box::pin(tokio::time::sleep(after)));
                    }
                }
            }

            self.projection_tx.send_replace(Projection::compute(&state));

            // Empty slots pend forever, so a bare select suffices.
            // Biased polling: cancellation beats a simultaneously-ready
            // timer, so no timer can fire after teardown.
            let wakeup = tokio::select! {
                biased;
                () = self.cancel.cancelled() => Wakeup::Cancelled,
                () = tagged_sleep(&mut phase_timer) => Wakeup::PhaseTimer,
                () = sleep_slot(&mut slow_timer) => Wakeup::SlowTimer,
                () = sleep_slot(&mut reveal_timer) => Wakeup::RevealTick,
                result = fetch_slot(&mut fetch) => Wakeup::FetchSettled(result),
            };

            let event = match wakeup {
                Wakeup::Cancelled => break,
                Wakeup::PhaseTimer => {
                    let (phase, _) = phase_timer.take().expect("phase timer fired");
                    Event::PhaseTimerFired(phase)
                }
                Wakeup::SlowTimer => {
                    slow_timer = None;
                    Event::SlowTimerFired
                }
                Wakeup::RevealTick => {
                    reveal_timer = None;
                    Event::RevealTick
                }
                Wakeup::FetchSettled(result) => {
                    fetch = None;
                    match result {
                        Ok(items) => {
                            self.emitter.emit(events::Event::FetchSucceeded {
                                timestamp: Utc::now(),
                                session_id: self.session_id,
                                item_count: items.len(),
                            });
                            metrics::record_fetch_outcome(if items.is_empty() {
                                "empty"
                            } else {
                                "succeeded"
                            });
                            Event::FetchResolved(items.into())
                        }
                        Err(e) => {
                            self.emitter.emit(events::Event::FetchFailed {
                                timestamp: Utc::now(),
                                session_id: self.session_id,
                                reason: e.to_string(),
                            });
                            metrics::record_fetch_outcome("failed");
                            Event::FetchFailed(e.to_string())
                        }
                    }
                }
            };

            let phase_before = state.phase();
            let exposed_before = state.reveal().exposed_items().len();
            let slow_before = state.slow_elapsed();

            effects = state.apply(event);

            self.observe(&state, phase_before, exposed_before, slow_before);
        }

        self.emitter.emit(events::Event::ControllerStopped {
            timestamp: Utc::now(),
            session_id: self.session_id,
            reason: "stopped".to_string(),
        });
        info!(session_id = %self.session_id, "controller stopped");
    }

    /// Emits events and metrics for whatever the last apply changed.
    fn observe(
        &self,
        state: &ControllerState,
        phase_before: Phase,
        exposed_before: usize,
        slow_before: bool,
    ) {
        if state.phase() != phase_before {
            self.note_phase(state.phase());
        }

        if state.slow_elapsed() && !slow_before {
            self.emitter.emit(events::Event::SlowTimeoutElapsed {
                timestamp: Utc::now(),
                session_id: self.session_id,
            });
            metrics::record_slow_timeout();
        }

        let exposed = state.reveal().exposed_items();
        if exposed.len() > exposed_before {
            let item = &exposed[exposed.len() - 1];
            self.emitter.emit(events::Event::ItemRevealed {
                timestamp: Utc::now(),
                session_id: self.session_id,
                index: exposed.len() - 1,
                name: item.name.clone(),
            });
            metrics::record_item_revealed();

            if state.reveal().is_exhausted() {
                self.emitter.emit(events::Event::RevealCompleted {
                    timestamp: Utc::now(),
                    session_id: self.session_id,
                    total: exposed.len(),
                });
            }
        }
    }

    fn note_phase(&self, phase: Phase) {
        self.emitter.emit(events::Event::PhaseEntered {
            timestamp: Utc::now(),
            session_id: self.session_id,
            phase: phase.name().to_string(),
            phase_index: phase.index(),
        });
        metrics::record_phase_transition(phase.name(), phase.index());
    }
}

impl std::fmt::Debug for PresentationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationController")
            .field("session_id", &self.session_id)
            .field("started", &self.started.load(Ordering::Relaxed))
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}

/// Awaits a tagged phase-timer slot; pends forever when empty.
async fn tagged_sleep(slot: &mut Option<(Phase, Pin<Box<Sleep>>)>) {
    match slot {
        Some((_, sleep)) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Awaits a sleep slot; pends forever when empty.
async fn sleep_slot(slot: &mut Option<Pin<Box<Sleep>>>) {
    match slot {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Awaits the in-flight fetch; pends forever when none.
async fn fetch_slot(
    slot: &mut Option<BoxFuture<'static, Result<Vec<Product>, CatalogError>>>,
) -> Result<Vec<Product>, CatalogError> {
    match slot {
        Some(fetch) => fetch.as_mut().await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
