//! Study analytics over stored sessions and tasks.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use serde::Serialize;

use crate::storage::KeyValueStore;
use crate::study::{StudySession, Task, SESSIONS, TASKS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskCompletion {
    pub created: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySummary {
    pub pomodoros: usize,
    pub total_minutes: u32,
    pub streak_days: u32,
    pub daily_minutes: BTreeMap<NaiveDate, u32>,
    /// Minutes studied per hour of day, index 0 = midnight.
    pub hourly_minutes: [u32; 24],
    pub most_productive_hour: Option<u8>,
    pub tasks: TaskCompletion,
}

pub struct StudyAnalyzer {
    sessions: Vec<StudySession>,
    tasks: Vec<Task>,
}

impl StudyAnalyzer {
    pub fn new(sessions: Vec<StudySession>, tasks: Vec<Task>) -> Self {
        Self { sessions, tasks }
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self::new(SESSIONS.records(store), TASKS.records(store))
    }

    /// Minutes studied per day.
    pub fn daily_study_time(&self) -> BTreeMap<NaiveDate, u32> {
        let mut daily = BTreeMap::new();
        for s in &self.sessions {
            *daily.entry(s.date).or_insert(0) += s.duration_minutes;
        }
        daily
    }

    pub fn pomodoro_count(&self) -> usize {
        self.sessions.len()
    }

    /// Consecutive study days ending at the most recent day with a session.
    pub fn study_streak(&self) -> u32 {
        let days: Vec<NaiveDate> = self.daily_study_time().into_keys().collect();
        let Some(mut last) = days.last().copied() else {
            return 0;
        };

        let mut streak = 1;
        for day in days.iter().rev().skip(1) {
            if last.signed_duration_since(*day).num_days() == 1 {
                streak += 1;
                last = *day;
            } else {
                break;
            }
        }
        streak
    }

    /// Minutes per completion hour. Sessions without a timestamp are skipped.
    pub fn productive_hours(&self) -> [u32; 24] {
        let mut hours = [0u32; 24];
        for s in &self.sessions {
            if let Some(at) = s.completed_at {
                hours[at.hour() as usize] += s.duration_minutes;
            }
        }
        hours
    }

    pub fn task_completion(&self) -> TaskCompletion {
        TaskCompletion {
            created: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
        }
    }

    pub fn summary(&self) -> StudySummary {
        let daily_minutes = self.daily_study_time();
        let hourly_minutes = self.productive_hours();
        let most_productive_hour = hourly_minutes
            .iter()
            .enumerate()
            .filter(|(_, m)| **m > 0)
            // Earliest hour wins ties.
            .max_by(|(ha, a), (hb, b)| a.cmp(b).then(hb.cmp(ha)))
            .map(|(h, _)| h as u8);

        StudySummary {
            pomodoros: self.pomodoro_count(),
            total_minutes: daily_minutes.values().sum(),
            streak_days: self.study_streak(),
            daily_minutes,
            hourly_minutes,
            most_productive_hour,
            tasks: self.task_completion(),
        }
    }
}
