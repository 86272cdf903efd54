//! Per-call diagnostic handle.
//!
//! A process-global trace buffer read back via some `get_log()` call can't
//! be tested deterministically once more than one caller is active, and
//! this engine is meant to support independent concurrent queries, so
//! instead every `compile`/`run_match`/`combo_run` entry point takes an
//! `&mut Diagnostics` that the caller owns and can inspect afterward.
//!
//! Each recorded event is also emitted through the `log` crate's facade at
//! a matching level, so a host process that installs a real subscriber
//! (`env_logger`, `tracing-log`, ...) sees the same events without having to
//! thread a `Diagnostics` handle of its own through.

use std::fmt;

/// Severity of a recorded diagnostic event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Coarse progress markers (compiled a program, started a combo run).
    Debug,
    /// Fine-grained tracing (every quantifier unrolled, every frame pushed).
    Trace,
}

/// A single recorded diagnostic event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Severity of the event.
    pub level: Level,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// A per-call log of compiler/matcher/combo-engine events.
///
/// Unlike a process-global log, a `Diagnostics` handle belongs to
/// exactly one caller and one call; nothing here is shared between threads
/// or between queries.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    events: Vec<Event>,
}

impl Diagnostics {
    /// Creates an empty diagnostics handle.
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    /// Records an event and forwards it to the `log` facade.
    pub fn record(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Debug => log::debug!("{message}"),
            Level::Trace => log::trace!("{message}"),
        }
        self.events.push(Event { level, message });
    }

    /// All events recorded so far, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Human-readable rendering of every recorded event, one per line.
    pub fn debug(&self) -> String {
        self.events.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
    }

    /// Discards all recorded events, keeping the allocation.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
