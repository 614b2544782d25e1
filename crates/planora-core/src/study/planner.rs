//! Task planning and progress logging over the persisted collections.
//!
//! Every mutation reads the whole collection, edits it, and writes it back.
//! The store is single-user, so last write wins.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::model::{StudySession, Task, TaskUpdate, SESSIONS, TASKS, UPDATES};
use crate::error::{Result, ValidationError};
use crate::storage::{KeyValueStore, STUDY_TASKS};

/// Everything that happened on one calendar day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub tasks_due: Vec<Task>,
    pub sessions: Vec<StudySession>,
    pub updates: Vec<TaskUpdate>,
    pub minutes_studied: u32,
}

/// Counts for one cell of a month overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub tasks_due: usize,
    pub tasks_completed: usize,
    pub sessions: usize,
    pub minutes_studied: u32,
}

/// New progress note, before it gets an id.
#[derive(Debug, Clone)]
pub struct NewUpdate {
    pub task_id: String,
    pub date: NaiveDate,
    pub notes: String,
    pub progress: u8,
    pub time_spent: u32,
}

pub struct Planner<S> {
    store: S,
}

impl<S: KeyValueStore> Planner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&self, task: Task) -> Result<Task> {
        task_validate(&task)?;
        TASKS.append(&self.store, task.clone())?;
        tracing::debug!(task_id = %task.id, "task added");
        Ok(task)
    }

    pub fn tasks(&self) -> Vec<Task> {
        TASKS.records(&self.store)
    }

    /// Tasks that can still be worked on.
    pub fn active_tasks(&self) -> Vec<Task> {
        self.tasks().into_iter().filter(|t| !t.completed).collect()
    }

    pub fn find_task(&self, id: &str) -> Option<Task> {
        self.tasks().into_iter().find(|t| t.id == id)
    }

    pub fn set_completed(&self, id: &str, completed: bool) -> Result<Task> {
        let mut tasks = TASKS.records_for_update(&self.store)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(STUDY_TASKS, id))?;
        task.completed = completed;
        let updated = task.clone();
        TASKS.save(&self.store, &tasks)?;
        Ok(updated)
    }

    /// Remove a task and its progress notes. Sessions stay; they belong to the subject.
    pub fn delete_task(&self, id: &str) -> Result<Task> {
        let mut tasks = TASKS.records_for_update(&self.store)?;
        let updates = UPDATES.records_for_update(&self.store)?;
        let pos = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found(STUDY_TASKS, id))?;
        let removed = tasks.remove(pos);
        TASKS.save(&self.store, &tasks)?;

        if updates.iter().any(|u| u.task_id == id) {
            let kept: Vec<_> = updates.into_iter().filter(|u| u.task_id != id).collect();
            UPDATES.save(&self.store, &kept)?;
        }
        Ok(removed)
    }

    // ── Sessions ─────────────────────────────────────────────────────

    pub fn sessions(&self) -> Vec<StudySession> {
        SESSIONS.records(&self.store)
    }

    pub fn sessions_on(&self, date: NaiveDate) -> Vec<StudySession> {
        self.sessions().into_iter().filter(|s| s.date == date).collect()
    }

    // ── Progress updates ─────────────────────────────────────────────

    pub fn updates(&self) -> Vec<TaskUpdate> {
        UPDATES.records(&self.store)
    }

    pub fn updates_for(&self, task_id: &str) -> Vec<TaskUpdate> {
        self.updates()
            .into_iter()
            .filter(|u| u.task_id == task_id)
            .collect()
    }

    /// Log progress against a task. Reaching 100% marks the task completed.
    ///
    /// The task is written before the update, so a failed second write leaves
    /// a completed task without its note rather than a 100% note on an open
    /// task.
    pub fn record_update(&self, new: NewUpdate) -> Result<TaskUpdate> {
        if new.notes.trim().is_empty() {
            return Err(ValidationError::invalid("notes", "must not be empty").into());
        }
        let update = TaskUpdate {
            id: uuid::Uuid::new_v4().to_string(),
            task_id: new.task_id,
            date: new.date,
            notes: new.notes,
            progress: new.progress,
            time_spent: new.time_spent,
        };
        crate::storage::Record::validate(&update)?;

        let mut tasks = TASKS.records_for_update(&self.store)?;
        let mut updates = UPDATES.records_for_update(&self.store)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == update.task_id)
            .ok_or_else(|| not_found(STUDY_TASKS, &update.task_id))?;

        let completes = update.progress == 100 && !task.completed;
        if completes {
            task.completed = true;
            TASKS.save(&self.store, &tasks)?;
            tracing::info!(task_id = %update.task_id, "task completed by progress update");
        }

        updates.push(update.clone());
        if let Err(e) = UPDATES.save(&self.store, &updates) {
            if completes {
                tracing::warn!(task_id = %update.task_id, error = %e, "task completed but its progress note was not stored");
            }
            return Err(e.into());
        }
        Ok(update)
    }

    pub fn delete_update(&self, id: &str) -> Result<TaskUpdate> {
        let mut updates = UPDATES.records_for_update(&self.store)?;
        let pos = updates
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| not_found(crate::storage::TASK_UPDATES, id))?;
        let removed = updates.remove(pos);
        UPDATES.save(&self.store, &updates)?;
        Ok(removed)
    }

    // ── Calendar ─────────────────────────────────────────────────────

    pub fn day(&self, date: NaiveDate) -> DayView {
        let tasks_due: Vec<_> = self
            .tasks()
            .into_iter()
            .filter(|t| t.due_date == date)
            .collect();
        let sessions = self.sessions_on(date);
        let updates: Vec<_> = self
            .updates()
            .into_iter()
            .filter(|u| u.date == date)
            .collect();
        let minutes_studied = sessions.iter().map(|s| s.duration_minutes).sum();
        DayView {
            date,
            tasks_due,
            sessions,
            updates,
            minutes_studied,
        }
    }

    /// One summary per day of `month`, in date order, empty days included.
    pub fn month(&self, year: i32, month: u32) -> Result<Vec<DaySummary>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ValidationError::invalid("month", format!("no such month: {year}-{month:02}"))
        })?;
        let tasks = self.tasks();
        let sessions = self.sessions();

        let days = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|date| {
                let due: Vec<_> = tasks.iter().filter(|t| t.due_date == date).collect();
                let studied: Vec<_> = sessions.iter().filter(|s| s.date == date).collect();
                DaySummary {
                    date,
                    tasks_due: due.len(),
                    tasks_completed: due.iter().filter(|t| t.completed).count(),
                    sessions: studied.len(),
                    minutes_studied: studied.iter().map(|s| s.duration_minutes).sum(),
                }
            })
            .collect();
        Ok(days)
    }
}

fn task_validate(task: &Task) -> std::result::Result<(), ValidationError> {
    crate::storage::Record::validate(task)?;
    if task.subject.trim().is_empty() {
        return Err(ValidationError::invalid("subject", "must not be empty"));
    }
    Ok(())
}

fn not_found(collection: &str, id: &str) -> ValidationError {
    ValidationError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}
