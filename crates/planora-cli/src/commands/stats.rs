use planora_core::{Database, StudyAnalyzer};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let summary = StudyAnalyzer::load(&db).summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
