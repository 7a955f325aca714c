//! Per-call phase tracking for encode and decode.

use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Phase {
    Idle,
    FrequencyPass,
    TrieBuilt,
    CodeTableBuilt,
    Streaming,
    Closed,
}

/// Milliseconds spent on the work of each phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseTimings {
    pub frequency_pass_ms: f64,
    pub trie_build_ms: f64,
    pub code_table_ms: f64,
    pub streaming_ms: f64,
    pub total_ms: f64,
}

impl PhaseTimings {
    fn charge(&mut self, phase: Phase, elapsed: Duration) {
        let ms = elapsed.as_secs_f64() * 1000.0;
        match phase {
            Phase::FrequencyPass => self.frequency_pass_ms += ms,
            Phase::TrieBuilt => self.trie_build_ms += ms,
            Phase::CodeTableBuilt => self.code_table_ms += ms,
            Phase::Streaming | Phase::Closed => self.streaming_ms += ms,
            Phase::Idle => {}
        }
    }
}

/// One encode or decode call. Phases are recorded as they complete and only
/// move forward; the time since the previous milestone is charged to the
/// phase just completed.
pub(crate) struct Session {
    phase: Phase,
    started: Instant,
    last: Instant,
    timings: PhaseTimings,
}

impl Session {
    pub(crate) fn new() -> Self {
        let now = Instant::now();
        Self {
            phase: Phase::Idle,
            started: now,
            last: now,
            timings: PhaseTimings::default(),
        }
    }

    /// Mark `done` as finished.
    pub(crate) fn complete(&mut self, done: Phase) {
        debug_assert!(done > self.phase, "{:?} after {:?}", done, self.phase);
        let now = Instant::now();
        let elapsed = now - self.last;
        self.timings.charge(done, elapsed);
        tracing::debug!(
            phase = ?done,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "phase complete"
        );
        self.phase = done;
        self.last = now;
    }

    /// The last completed phase.
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    /// Close the session and return its timings.
    pub(crate) fn close(mut self) -> PhaseTimings {
        if self.phase() != Phase::Closed {
            self.complete(Phase::Closed);
        }
        self.timings.total_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.timings
    }
}
