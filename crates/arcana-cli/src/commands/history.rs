use arcana_core::ReadingHistory;

pub fn run(dir: &str) -> super::CliResult {
    let history = ReadingHistory::open(dir)?;
    let entries = history.list()?;
    if entries.is_empty() {
        println!("No readings in {}", history.dir().display());
        return Ok(());
    }

    println!(
        "{:<26} {:<20} {:<16} {:>5}  {}",
        "Created", "Spread", "Entropy", "Cards", "Id"
    );
    println!("{}", "-".repeat(108));
    for entry in &entries {
        println!(
            "{:<26} {:<20} {:<16} {:>5}  {}",
            entry.created_at,
            entry.spread.to_string(),
            entry.mode.as_str(),
            entry.cards.len(),
            entry.id
        );
    }
    println!("\n{} reading(s) in {}", entries.len(), history.dir().display());
    Ok(())
}
