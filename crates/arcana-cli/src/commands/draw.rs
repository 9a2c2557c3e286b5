use log::debug;

use arcana_core::{
    DeckType, EngineConfig, Language, RandomMode, Reading, ReadingAssembler,
    ReadingConfiguration, ReadingHistory, SpreadType,
};

pub struct DrawCommandConfig<'a> {
    pub spread: SpreadType,
    pub deck: DeckType,
    pub mode: RandomMode,
    pub allow_reversed: bool,
    pub language: Language,
    pub json: bool,
    pub save_dir: Option<&'a str>,
}

pub fn run(engine: &EngineConfig, cmd: DrawCommandConfig<'_>) -> super::CliResult {
    let config = ReadingConfiguration {
        spread: cmd.spread,
        allow_reversed: cmd.allow_reversed,
        deck: cmd.deck,
        mode: cmd.mode,
        language: cmd.language,
    };
    debug!("drawing {config:?} against {}", engine.qrng_url);
    let assembler = ReadingAssembler::from_config(engine);
    let reading = super::runtime()?.block_on(assembler.assemble(&config))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        print!("{}", render(&reading, cmd.language));
    }

    if let Some(dir) = cmd.save_dir {
        let path = ReadingHistory::open(dir)?.save(&reading)?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(())
}

/// Human-readable reading: one line per position, then the entropy record.
pub fn render(reading: &Reading, language: Language) -> String {
    let mut out = format!(
        "🔮 {} · {} · {}\n\n",
        reading.configuration.spread, reading.configuration.deck, reading.created_at
    );
    let width = reading
        .cards
        .iter()
        .map(|d| d.position.chars().count())
        .max()
        .unwrap_or(0);
    for drawn in &reading.cards {
        let reversed = if drawn.card.is_reversed() {
            match language {
                Language::Fr => " (renversée)",
                Language::En => " (reversed)",
            }
        } else {
            ""
        };
        let pad = width - drawn.position.chars().count();
        out.push_str(&format!(
            "  {}{}  {:>2}  {}{}\n",
            drawn.position,
            " ".repeat(pad),
            drawn.card.id,
            drawn.card.display_name(language),
            reversed
        ));
    }
    out.push_str(&format!(
        "\n  entropy: {}\n  seal:    {}\n  id:      {}\n",
        reading.entropy.mode, reading.entropy.digest, reading.id
    ));
    out
}
