//! Pure transition core for the staged presentation sequence
//!
//! The machine holds all controller state and advances it one event at
//! a time. Applying an event returns the effects the shell must carry
//! out (arm a timer, issue the fetch). Nothing here reads a clock or
//! performs I/O, so every transition is testable synchronously.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::Product;
use crate::config::Schedule;

// ============================================================================
// Phase
// ============================================================================

/// One discrete stage of the landing-page presentation sequence.
///
/// Exactly one phase is active at any instant. Transitions are
/// forward-only within one controller lifetime; no phase is revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Initial full-screen loader.
    InitialLoading,
    /// Animated progress indicator.
    ProgressAnimation,
    /// Promotional animation; the catalog fetch is issued on entry.
    PromotionalAnimation,
    /// Content area unlocked; the revealer may run.
    ContentReady,
}

impl Phase {
    /// The phase after this one, or `None` from the final phase.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::InitialLoading => Some(Self::ProgressAnimation),
            Self::ProgressAnimation => Some(Self::PromotionalAnimation),
            Self::PromotionalAnimation => Some(Self::ContentReady),
            Self::ContentReady => None,
        }
    }

    /// Zero-based index of this phase in the sequence.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::InitialLoading => 0,
            Self::ProgressAnimation => 1,
            Self::PromotionalAnimation => 2,
            Self::ContentReady => 3,
        }
    }

    /// Stable snake_case name, for logs and metrics labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::InitialLoading => "initial_loading",
            Self::ProgressAnimation => "progress_animation",
            Self::PromotionalAnimation => "promotional_animation",
            Self::ContentReady => "content_ready",
        }
    }

    /// How long this phase lasts under the given schedule, or `None`
    /// for the final phase (which only ends with the lifetime).
    #[must_use]
    pub const fn duration(self, schedule: &Schedule) -> Option<Duration> {
        match self {
            Self::InitialLoading => Some(schedule.initial_loading),
            Self::ProgressAnimation => Some(schedule.progress_animation),
            Self::PromotionalAnimation => Some(schedule.promotional_animation),
            Self::ContentReady => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// Lifecycle of the single catalog fetch.
///
/// Owned exclusively by the controller for one lifetime; there is no
/// retry, so `Failed` is terminal for the outcome itself (the display
/// still degrades in two tiers).
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The fetch has not been issued yet (phases before the
    /// promotional animation).
    NotIssued,
    /// Issued, no resolution observed.
    Pending,
    /// Resolved with a product list (possibly empty).
    Succeeded(Arc<[Product]>),
    /// Resolved with a failure; the reason is kept for logs.
    Failed(String),
}

impl FetchOutcome {
    /// Whether the outcome is a success with zero items.
    #[must_use]
    pub fn is_empty_success(&self) -> bool {
        matches!(self, Self::Succeeded(items) if items.is_empty())
    }
}

// ============================================================================
// Reveal State
// ============================================================================

/// Items already exposed to the view, as a cursor into the fetched
/// list. Grows monotonically within one feed; never shrinks except
/// when a different list is fed.
#[derive(Debug, Clone, Default)]
pub struct RevealState {
    items: Option<Arc<[Product]>>,
    exposed: usize,
}

impl RevealState {
    /// Feeds a list into the revealer.
    ///
    /// Returns `true` when a reveal tick should be scheduled:
    /// - first feed of a non-empty list
    /// - a *different* list (by allocation identity) resets the cursor
    ///   and restarts from the new list's head
    ///
    /// Re-feeding the same list is a no-op, and an empty list never
    /// schedules anything (the legitimate "no products" terminal state).
    pub fn feed(&mut self, items: Arc<[Product]>) -> bool {
        if let Some(current) = &self.items {
            if Arc::ptr_eq(current, &items) {
                return false;
            }
            warn!("revealer fed a different list; resetting cursor");
            self.exposed = 0;
        }
        let schedule = !items.is_empty();
        self.items = Some(items);
        schedule
    }

    /// Exposes the next item, returning it. `None` once exhausted or
    /// before any feed.
    pub fn expose_next(&mut self) -> Option<&Product> {
        let items = self.items.as_ref()?;
        let item = items.get(self.exposed)?;
        self.exposed += 1;
        Some(item)
    }

    /// The items currently exposed to the view, in original order.
    #[must_use]
    pub fn exposed_items(&self) -> &[Product] {
        self.items
            .as_deref()
            .map_or(&[], |items| &items[..self.exposed])
    }

    /// Whether every fed item has been exposed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.items
            .as_deref()
            .is_none_or(|items| self.exposed >= items.len())
    }

    /// Total number of fed items, if a list has been fed.
    #[must_use]
    pub fn total(&self) -> Option<usize> {
        self.items.as_deref().map(<[Product]>::len)
    }
}

// ============================================================================
// Events and Effects
// ============================================================================

/// An input to the machine. Produced by the shell's timers and the
/// fetch resolution.
#[derive(Debug, Clone)]
pub enum Event {
    /// The lifetime begins.
    Start,
    /// The one-shot timer bounding `phase` fired.
    PhaseTimerFired(Phase),
    /// The catalog fetch resolved with a product list.
    FetchResolved(Arc<[Product]>),
    /// The catalog fetch resolved with a failure.
    FetchFailed(String),
    /// The slow timeout elapsed.
    SlowTimerFired,
    /// One reveal cadence tick fired.
    RevealTick,
}

/// An instruction to the shell, produced by applying an event.
///
/// Every timer effect describes a one-shot delay; the shell owns
/// cancellation (on teardown, every pending timer dies with the
/// driver task).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the one-shot timer that ends `phase` after `after`.
    SchedulePhaseTimer {
        /// Phase the timer belongs to.
        phase: Phase,
        /// Delay before it fires.
        after: Duration,
    },
    /// Issue the catalog fetch. Emitted at most once per lifetime.
    IssueFetch,
    /// Arm the slow-timeout timer.
    ScheduleSlowTimer {
        /// Delay before the failure escalates.
        after: Duration,
    },
    /// Arm the next one-shot reveal tick.
    ScheduleRevealTick {
        /// Delay before the next item is exposed.
        after: Duration,
    },
}

// ============================================================================
// Controller State
// ============================================================================

/// The complete machine state: current phase, fetch outcome, reveal
/// cursor, and the escalation flag.
#[derive(Debug, Clone)]
pub struct ControllerState {
    schedule: Schedule,
    phase: Phase,
    outcome: FetchOutcome,
    reveal: RevealState,
    fetch_issued: bool,
    slow_elapsed: bool,
}

impl ControllerState {
    /// Creates the state for a fresh lifetime, at the initial phase.
    #[must_use]
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            phase: Phase::InitialLoading,
            outcome: FetchOutcome::NotIssued,
            reveal: RevealState::default(),
            fetch_issued: false,
            slow_elapsed: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current fetch outcome.
    #[must_use]
    pub const fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    /// Reveal state.
    #[must_use]
    pub const fn reveal(&self) -> &RevealState {
        &self.reveal
    }

    /// Whether the slow timeout has elapsed against a failed fetch.
    #[must_use]
    pub const fn slow_elapsed(&self) -> bool {
        self.slow_elapsed
    }

    /// The schedule this lifetime runs under.
    #[must_use]
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Applies one event, returning the effects the shell must execute.
    ///
    /// Transitions are forward-only; stale or impossible events (a
    /// timer for a phase that already ended, a second fetch
    /// resolution) are ignored rather than corrupting state.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Start => self.on_start(),
            Event::PhaseTimerFired(phase) => self.on_phase_timer(phase),
            Event::FetchResolved(items) => self.on_fetch_resolved(items),
            Event::FetchFailed(reason) => self.on_fetch_failed(reason),
            Event::SlowTimerFired => self.on_slow_timer(),
            Event::RevealTick => self.on_reveal_tick(),
        }
    }

    fn on_start(&mut self) -> Vec<Effect> {
        info!(phase = %self.phase, "sequence started");
        self.phase
            .duration(&self.schedule)
            .map(|after| Effect::SchedulePhaseTimer {
                phase: self.phase,
                after,
            })
            .into_iter()
            .collect()
    }

    fn on_phase_timer(&mut self, phase: Phase) -> Vec<Effect> {
        if phase != self.phase {
            // A timer for an already-ended phase. The shell cancels
            // timers on transition, so this is unreachable in normal
            // operation.
            debug!(fired = %phase, current = %self.phase, "stale phase timer ignored");
            return Vec::new();
        }
        let Some(next) = self.phase.next() else {
            return Vec::new();
        };

        info!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;

        let mut effects = Vec::new();
        if let Some(after) = next.duration(&self.schedule) {
            effects.push(Effect::SchedulePhaseTimer { phase: next, after });
        }

        // The fetch is kicked off partway through the sequence, on
        // entry to the promotional animation, so a fast network cannot
        // flash empty content and a slow one hides behind the animation.
        if next == Phase::PromotionalAnimation && !self.fetch_issued {
            self.fetch_issued = true;
            self.outcome = FetchOutcome::Pending;
            effects.push(Effect::IssueFetch);
        }

        if next == Phase::ContentReady {
            effects.extend(self.maybe_start_reveal());
        }

        effects
    }

    fn on_fetch_resolved(&mut self, items: Arc<[Product]>) -> Vec<Effect> {
        if matches!(self.outcome, FetchOutcome::Succeeded(_) | FetchOutcome::Failed(_)) {
            debug!("duplicate fetch resolution ignored");
            return Vec::new();
        }
        info!(count = items.len(), "catalog fetch succeeded");
        self.outcome = FetchOutcome::Succeeded(items);
        self.maybe_start_reveal()
    }

    fn on_fetch_failed(&mut self, reason: String) -> Vec<Effect> {
        if matches!(self.outcome, FetchOutcome::Succeeded(_) | FetchOutcome::Failed(_)) {
            debug!("duplicate fetch resolution ignored");
            return Vec::new();
        }
        warn!(%reason, "catalog fetch failed; absorbing as soft wait");
        self.outcome = FetchOutcome::Failed(reason);
        vec![Effect::ScheduleSlowTimer {
            after: self.schedule.slow_timeout,
        }]
    }

    fn on_slow_timer(&mut self) -> Vec<Effect> {
        if matches!(self.outcome, FetchOutcome::Failed(_)) {
            warn!("slow timeout elapsed; escalating to network error");
            self.slow_elapsed = true;
        }
        Vec::new()
    }

    fn on_reveal_tick(&mut self) -> Vec<Effect> {
        let Some(item) = self.reveal.expose_next() else {
            return Vec::new();
        };
        debug!(name = %item.name, "item revealed");

        if self.reveal.is_exhausted() {
            info!(total = self.reveal.exposed, "reveal complete");
            Vec::new()
        } else {
            vec![Effect::ScheduleRevealTick {
                after: self.schedule.reveal_interval,
            }]
        }
    }

    /// Starts the revealer once both gates hold: the phase permits and
    /// items are available — whichever happened last.
    fn maybe_start_reveal(&mut self) -> Vec<Effect> {
        if self.phase != Phase::ContentReady {
            return Vec::new();
        }
        let FetchOutcome::Succeeded(items) = &self.outcome else {
            return Vec::new();
        };
        if self.reveal.feed(Arc::clone(items)) {
            vec![Effect::ScheduleRevealTick {
                after: self.schedule.reveal_interval,
            }]
        } else {
            Vec::new()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
