//! Study planner data: tasks, focus sessions and progress notes.

mod model;
mod planner;

pub use model::{Priority, StudySession, Task, TaskUpdate, SESSIONS, TASKS, UPDATES};
pub use planner::{DaySummary, DayView, NewUpdate, Planner};
