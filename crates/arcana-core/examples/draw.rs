//! Draw a three-card reading and check it against its own entropy record.
//!
//! Run: `cargo run --example draw`
//! Add `RUST_LOG=debug` to watch the quantum fetch or the sensor fallback.

use arcana_core::{EngineConfig, Language, ReadingAssembler, ReadingConfiguration, verify_reading};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let assembler = ReadingAssembler::from_config(&EngineConfig::default());
    let config = ReadingConfiguration {
        language: Language::En,
        ..Default::default()
    };
    let reading = assembler.assemble(&config).await?;

    println!("Reading {} ({} entropy)", reading.id, reading.entropy.mode);
    for drawn in &reading.cards {
        let reversed = if drawn.card.is_reversed() { " (reversed)" } else { "" };
        println!(
            "  {:<10} {}{}",
            drawn.position,
            drawn.card.display_name(Language::En),
            reversed
        );
    }
    println!("Seal: {}", reading.entropy.digest);

    let report = verify_reading(&reading)?;
    println!("Verification: {report}");
    Ok(())
}
