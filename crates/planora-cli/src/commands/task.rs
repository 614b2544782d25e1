//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use planora_core::{Clock, Database, Planner, Priority, SystemClock, Task};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Subject the task belongs to
        #[arg(long)]
        subject: String,
        /// Due date (YYYY-MM-DD, default today)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// Filter by subject
        #[arg(long)]
        subject: Option<String>,
    },
    /// Get task details
    Show {
        /// Task ID
        id: String,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: String,
        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a task and its progress notes
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let planner = Planner::new(Database::open()?);

    match action {
        TaskAction::Add {
            title,
            subject,
            due,
            priority,
            notes,
        } => {
            let due = due.unwrap_or_else(|| SystemClock.today());
            let mut task = Task::new(title, subject, due).with_priority(priority);
            if let Some(notes) = notes {
                task = task.with_notes(notes);
            }
            let task = planner.add_task(task)?;
            eprintln!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { all, subject } => {
            let tasks = if all {
                planner.tasks()
            } else {
                planner.active_tasks()
            };
            let filtered: Vec<_> = tasks
                .into_iter()
                .filter(|t| {
                    subject
                        .as_deref()
                        .map_or(true, |s| t.subject.eq_ignore_ascii_case(s))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        TaskAction::Show { id } => match planner.find_task(&id) {
            Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
            None => return Err(format!("Task not found: {id}").into()),
        },
        TaskAction::Complete { id, undo } => {
            let task = planner.set_completed(&id, !undo)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            let task = planner.delete_task(&id)?;
            eprintln!("Task deleted: {}", task.id);
        }
    }
    Ok(())
}
