use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::study::StudySession;
use crate::timer::{Phase, TimerState};

/// Every state change of the session timer produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero and the timer flipped to the other phase.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        /// Focus phases completed since the timer was created.
        completed_focus: u32,
        /// Session handed to the sink, if a task was selected.
        session: Option<StudySession>,
        at: DateTime<Utc>,
    },
    DurationChanged {
        phase: Phase,
        minutes: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TaskSelected {
        task_id: Option<String>,
        subject: Option<String>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        /// `MM:SS` rendering of the remaining time.
        clock: String,
        /// 0.0 .. 100.0 progress within the current phase.
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
