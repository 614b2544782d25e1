//! Records persisted by the study suite.
//!
//! Field names on the wire are camelCase to match the stored collections.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::{Collection, Record, STUDY_SESSIONS, STUDY_TASKS, TASK_UPDATES};

pub const TASKS: Collection<Task> = Collection::new(STUDY_TASKS);
pub const SESSIONS: Collection<StudySession> = Collection::new(STUDY_SESSIONS);
pub const UPDATES: Collection<TaskUpdate> = Collection::new(TASK_UPDATES);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::invalid(
                "priority",
                format!("expected low, medium or high, got '{other}'"),
            )),
        }
    }
}

/// A planned unit of study work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    pub fn new(title: impl Into<String>, subject: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            subject: subject.into(),
            due_date,
            priority: Priority::default(),
            completed: false,
            notes: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl Record for Task {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::invalid("id", "must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        Ok(())
    }
}

/// One completed focus phase, tied to a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject: String,
    #[serde(rename = "duration", alias = "durationMinutes")]
    pub duration_minutes: u32,
    pub date: NaiveDate,
    /// Local time the focus phase ended. Older records lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

impl StudySession {
    pub fn new(subject: impl Into<String>, duration_minutes: u32, completed_at: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subject: subject.into(),
            duration_minutes,
            date: completed_at.date(),
            completed_at: Some(completed_at),
        }
    }
}

impl Record for StudySession {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::invalid("id", "must not be empty"));
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::invalid("duration", "must be positive"));
        }
        Ok(())
    }
}

/// A dated progress note against a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub id: String,
    pub task_id: String,
    pub date: NaiveDate,
    pub notes: String,
    /// Percent complete, 0-100.
    pub progress: u8,
    /// Minutes spent.
    pub time_spent: u32,
}

impl Record for TaskUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.progress > 100 {
            return Err(ValidationError::invalid(
                "progress",
                format!("{} is above 100", self.progress),
            ));
        }
        if self.task_id.trim().is_empty() {
            return Err(ValidationError::invalid("taskId", "must not be empty"));
        }
        Ok(())
    }
}
