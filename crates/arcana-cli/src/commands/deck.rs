use arcana_core::{Arcana, Card, DeckType, Language, deck};

pub fn run(major_only: bool, language: Language) -> super::CliResult {
    let deck_type = if major_only {
        DeckType::MajorOnly
    } else {
        DeckType::Full
    };
    let cards = deck(deck_type);
    println!("{:>3}  {:<28} {:<18} Keywords", "Id", "Name", "Arcana");
    println!("{}", "-".repeat(80));
    for card in &cards {
        println!(
            "{:>3}  {:<28} {:<18} {}",
            card.id,
            card.display_name(language),
            arcana_label(card, language),
            card.keywords.join(", ")
        );
    }
    println!("\n{} cards ({deck_type})", cards.len());
    Ok(())
}

fn arcana_label(card: &Card, language: Language) -> String {
    match card.arcana {
        Arcana::Major => "Major".to_string(),
        Arcana::Minor { suit, rank } => {
            format!("{} {rank} ({})", suit.name(language), suit.element())
        }
    }
}
