use arcana_core::{Language, SpreadType};

pub fn run(language: Language) -> super::CliResult {
    for spread in SpreadType::ALL {
        let descriptor = spread.descriptor(language);
        println!("{spread} ({} cards)", descriptor.card_count);
        println!("  {}", spread.description());
        for (i, label) in descriptor.positions.iter().enumerate() {
            println!("  {:>2}. {label}", i + 1);
        }
        println!();
    }
    Ok(())
}
