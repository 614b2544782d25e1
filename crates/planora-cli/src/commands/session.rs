use chrono::NaiveDate;
use clap::Subcommand;
use planora_core::{Database, Planner};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List recorded focus sessions
    List {
        /// Only sessions on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let planner = Planner::new(Database::open()?);

    match action {
        SessionAction::List { date } => {
            let sessions = match date {
                Some(date) => planner.sessions_on(date),
                None => planner.sessions(),
            };
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}
