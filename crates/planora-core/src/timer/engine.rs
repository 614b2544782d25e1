//! Session timer implementation.
//!
//! The session timer is a tick-driven state machine. It does not own a clock
//! thread - the caller (normally [`TimerContext`](super::TimerContext)) calls
//! `tick()` once per second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! Focus/Paused <-> Focus/Running --(0s)--> Break/Paused
//! Break/Paused <-> Break/Running --(0s)--> Focus/Paused
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::new(TimerSettings::default())
//!     .with_sink(CollectionSink::new(store));
//! timer.start();
//! // Once per second:
//! timer.tick(); // Returns Some(Event::PhaseCompleted) when a phase ends
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::{format_clock, Phase, TimerSettings};
use crate::clock::{Clock, SystemClock};
use crate::events::Event;
use crate::notify::{phase_message, Notifier, NullNotifier};
use crate::sink::{DiscardSink, SessionSink};
use crate::study::{StudySession, Task};

/// Observable timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_secs: u64,
    pub is_running: bool,
    pub is_break: bool,
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub selected_task_id: Option<String>,
    /// Focus phases completed, whether or not a session was recorded.
    pub completed_focus: u32,
}

/// Focus/break countdown with its collaborators.
pub struct SessionTimer {
    settings: TimerSettings,
    phase: Phase,
    running: bool,
    remaining_secs: u64,
    completed_focus: u32,
    selected_task: Option<Task>,
    sink: Box<dyn SessionSink>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .field("running", &self.running)
            .field("remaining_secs", &self.remaining_secs)
            .field("completed_focus", &self.completed_focus)
            .field("selected_task", &self.selected_task.as_ref().map(|t| &t.id))
            .finish_non_exhaustive()
    }
}

impl SessionTimer {
    /// Create a paused timer at the start of a focus phase.
    ///
    /// Sessions are discarded and notifications dropped until collaborators
    /// are attached with the `with_*` builders.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            remaining_secs: settings.secs(Phase::Focus),
            settings,
            phase: Phase::Focus,
            running: false,
            completed_focus: 0,
            selected_task: None,
            sink: Box::new(DiscardSink),
            notifier: Box::new(NullNotifier),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_sink(mut self, sink: impl SessionSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    pub fn completed_focus(&self) -> u32 {
        self.completed_focus
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task.as_ref()
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            remaining_secs: self.remaining_secs,
            is_running: self.running,
            is_break: self.phase == Phase::Break,
            focus_minutes: self.settings.focus_minutes(),
            break_minutes: self.settings.break_minutes(),
            selected_task_id: self.selected_task.as_ref().map(|t| t.id.clone()),
            completed_focus: self.completed_focus,
        }
    }

    /// 0.0 .. 100.0 progress within the current phase.
    pub fn progress_pct(&self) -> f64 {
        let total = self.settings.secs(self.phase);
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs);
        elapsed as f64 / total as f64 * 100.0
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            clock: format_clock(self.remaining_secs),
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Back to a paused focus phase at full length. The counter is kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.running = false;
        self.phase = Phase::Focus;
        self.remaining_secs = self.settings.secs(Phase::Focus);
        Some(Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Call once per second. Returns `Some(Event::PhaseCompleted)` when the
    /// countdown reaches zero; does nothing while paused.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.complete_phase());
        }
        None
    }

    pub fn set_focus_duration(&mut self, minutes: u32) -> Option<Event> {
        self.set_duration(Phase::Focus, minutes)
    }

    pub fn set_break_duration(&mut self, minutes: u32) -> Option<Event> {
        self.set_duration(Phase::Break, minutes)
    }

    /// Attach the task that completed focus sessions are credited to.
    pub fn select_task(&mut self, task: Task) -> Option<Event> {
        let event = Event::TaskSelected {
            task_id: Some(task.id.clone()),
            subject: Some(task.subject.clone()),
            at: Utc::now(),
        };
        self.selected_task = Some(task);
        Some(event)
    }

    pub fn clear_task(&mut self) -> Option<Event> {
        self.selected_task.take()?;
        Some(Event::TaskSelected {
            task_id: None,
            subject: None,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_duration(&mut self, phase: Phase, minutes: u32) -> Option<Event> {
        if self.running {
            tracing::debug!(?phase, minutes, "duration change rejected while running");
            return None;
        }
        if !self.settings.set(phase, minutes) {
            tracing::warn!(?phase, minutes, "ignoring non-positive duration");
            return None;
        }
        if self.phase == phase {
            self.remaining_secs = self.settings.secs(phase);
        }
        Some(Event::DurationChanged {
            phase,
            minutes,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    fn complete_phase(&mut self) -> Event {
        self.running = false;
        let completed = self.phase;
        let mut session = None;

        if completed == Phase::Focus {
            self.completed_focus += 1;
            if let Some(task) = &self.selected_task {
                let record = StudySession::new(
                    task.subject.clone(),
                    self.settings.focus_minutes(),
                    self.clock.now(),
                );
                if let Err(e) = self.sink.record(record.clone()) {
                    tracing::warn!(session_id = %record.id, error = %e, "failed to hand off study session");
                }
                session = Some(record);
            }
        }

        self.phase = completed.other();
        self.remaining_secs = self.settings.secs(self.phase);
        tracing::info!(?completed, completed_focus = self.completed_focus, "phase completed");

        let (title, body) = phase_message(completed);
        self.notifier.notify(title, body);

        Event::PhaseCompleted {
            completed,
            next: self.phase,
            completed_focus: self.completed_focus,
            session,
            at: Utc::now(),
        }
    }
}
