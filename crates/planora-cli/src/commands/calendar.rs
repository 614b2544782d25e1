use chrono::NaiveDate;
use planora_core::{Clock, Database, Planner, SystemClock};

/// Parse `YYYY-MM` into a year and month.
pub fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got '{s}'"))?;
    let year = year
        .parse::<i32>()
        .map_err(|_| format!("invalid year in '{s}'"))?;
    let month = month
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| format!("invalid month in '{s}'"))?;
    Ok((year, month))
}

pub fn run(
    date: Option<NaiveDate>,
    month: Option<(i32, u32)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let planner = Planner::new(Database::open()?);
    match month {
        Some((year, month)) => {
            let days = planner.month(year, month)?;
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
        None => {
            let view = planner.day(date.unwrap_or_else(|| SystemClock.today()));
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }
    Ok(())
}
