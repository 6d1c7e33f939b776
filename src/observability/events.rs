//! Structured event stream for `vitrine`.
//!
//! Discrete, typed events emitted while a presentation sequence runs.
//! Events are serialized as newline-delimited JSON (JSONL) and include a
//! monotonically increasing sequence number for ordering guarantees.
//! Every event carries the session id of the controller lifetime that
//! produced it.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a presentation sequence.
///
/// Each variant is tagged with `"type"` when serialized to JSON so
/// consumers can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A controller lifetime has begun.
    ControllerStarted {
        /// When the controller started.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
    },

    /// A new presentation phase has been entered.
    PhaseEntered {
        /// When the transition occurred.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
        /// Name of the phase that was entered.
        phase: String,
        /// Zero-based index of the phase.
        phase_index: usize,
    },

    /// The catalog fetch was issued.
    FetchIssued {
        /// When the fetch was issued.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
    },

    /// The catalog fetch resolved successfully.
    FetchSucceeded {
        /// When the fetch resolved.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
        /// Number of items in the payload.
        item_count: usize,
    },

    /// The catalog fetch failed.
    FetchFailed {
        /// When the failure was observed.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
        /// Human-readable failure reason.
        reason: String,
    },

    /// The slow timeout elapsed with the fetch still failed.
    SlowTimeoutElapsed {
        /// When the timeout elapsed.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
    },

    /// One item was exposed to the view.
    ItemRevealed {
        /// When the item was revealed.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
        /// Zero-based index of the revealed item.
        index: usize,
        /// Product name, for log readability.
        name: String,
    },

    /// All fetched items have been exposed; the revealer is dormant.
    RevealCompleted {
        /// When the last item was revealed.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
        /// Total number of items revealed.
        total: usize,
    },

    /// The controller lifetime ended.
    ControllerStopped {
        /// When the controller stopped.
        timestamp: DateTime<Utc>,
        /// Session id for this controller lifetime.
        session_id: Uuid,
        /// Human-readable stop reason.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are silently dropped
/// because observability must never take down the sequence itself.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug — provide a manual impl.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates an emitter that writes to stderr.
    ///
    /// This is the default for `vitrine run` — stderr does not conflict
    /// with the rendered progress lines on stdout.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    ///
    /// Failures are silently dropped.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    /// In-memory writer for capturing emitter output in tests.
    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn session() -> Uuid {
        Uuid::nil()
    }

    fn sample_event() -> Event {
        Event::PhaseEntered {
            timestamp: DateTime::parse_from_rfc3339("2026-03-11T10:15:30Z")
                .unwrap()
                .with_timezone(&Utc),
            session_id: session(),
            phase: "promotional_animation".to_owned(),
            phase_index: 2,
        }
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_string(&sample_event()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["type"], "PhaseEntered");
        assert_eq!(parsed["phase"], "promotional_animation");
        assert_eq!(parsed["phase_index"], 2);
    }

    #[test]
    fn emitter_writes_valid_jsonl() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(sample_event());

        let output = tw.contents();
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(parsed["type"], "PhaseEntered");
        assert_eq!(parsed["sequence"], 0);
    }

    #[test]
    fn emitter_increments_sequence() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(sample_event());
        emitter.emit(Event::ControllerStopped {
            timestamp: Utc::now(),
            session_id: session(),
            reason: "done".to_owned(),
        });

        assert_eq!(emitter.event_count(), 2);

        let lines: Vec<serde_json::Value> = tw
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[1]["sequence"], 1);
    }

    #[test]
    fn all_event_variants_serialize_to_valid_json() {
        let now = Utc::now();
        let sid = session();
        let variants: Vec<Event> = vec![
            Event::ControllerStarted {
                timestamp: now,
                session_id: sid,
            },
            Event::PhaseEntered {
                timestamp: now,
                session_id: sid,
                phase: "content_ready".to_owned(),
                phase_index: 3,
            },
            Event::FetchIssued {
                timestamp: now,
                session_id: sid,
            },
            Event::FetchSucceeded {
                timestamp: now,
                session_id: sid,
                item_count: 9,
            },
            Event::FetchFailed {
                timestamp: now,
                session_id: sid,
                reason: "connection refused".to_owned(),
            },
            Event::SlowTimeoutElapsed {
                timestamp: now,
                session_id: sid,
            },
            Event::ItemRevealed {
                timestamp: now,
                session_id: sid,
                index: 0,
                name: "Blue Sapphire".to_owned(),
            },
            Event::RevealCompleted {
                timestamp: now,
                session_id: sid,
                total: 9,
            },
            Event::ControllerStopped {
                timestamp: now,
                session_id: sid,
                reason: "unmount".to_owned(),
            },
        ];

        for variant in &variants {
            let json = serde_json::to_string(variant).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert!(parsed.get("type").is_some(), "missing type tag: {json}");
            assert!(parsed.get("session_id").is_some(), "missing session id: {json}");
        }
    }

    #[test]
    fn envelope_flattens_event_fields() {
        let envelope = EventEnvelope {
            sequence: 7,
            event: sample_event(),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["sequence"], 7);
        assert_eq!(parsed["type"], "PhaseEntered");
        assert!(
            parsed.get("event").is_none(),
            "event field should be flattened"
        );
    }
}
