//! Progress notes against tasks.

use chrono::NaiveDate;
use clap::Subcommand;
use planora_core::{Clock, Database, NewUpdate, Planner, SystemClock};

#[derive(Subcommand)]
pub enum UpdateAction {
    /// Log progress on a task; 100% marks it completed
    Add {
        /// Task ID
        task_id: String,
        /// What was done
        #[arg(long)]
        notes: String,
        /// Percent complete (0-100)
        #[arg(long, default_value = "0")]
        progress: u8,
        /// Minutes spent
        #[arg(long, default_value = "30")]
        time_spent: u32,
        /// Day the work happened (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List progress notes
    List {
        /// Only notes for this task
        #[arg(long)]
        task: Option<String>,
    },
    /// Delete a progress note
    Delete {
        /// Update ID
        id: String,
    },
}

pub fn run(action: UpdateAction) -> Result<(), Box<dyn std::error::Error>> {
    let planner = Planner::new(Database::open()?);

    match action {
        UpdateAction::Add {
            task_id,
            notes,
            progress,
            time_spent,
            date,
        } => {
            let update = planner.record_update(NewUpdate {
                task_id,
                date: date.unwrap_or_else(|| SystemClock.today()),
                notes,
                progress,
                time_spent,
            })?;
            println!("{}", serde_json::to_string_pretty(&update)?);
        }
        UpdateAction::List { task } => {
            let updates = match task {
                Some(id) => planner.updates_for(&id),
                None => planner.updates(),
            };
            println!("{}", serde_json::to_string_pretty(&updates)?);
        }
        UpdateAction::Delete { id } => {
            let update = planner.delete_update(&id)?;
            eprintln!("Update deleted: {}", update.id);
        }
    }
    Ok(())
}
