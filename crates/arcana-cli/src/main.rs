//! CLI for arcana: draw tarot readings you can audit.

mod commands;

use clap::{Parser, Subcommand};

use arcana_core::{DeckType, Language, RandomMode, SpreadType};

#[derive(Parser)]
#[command(name = "arcana")]
#[command(about = "arcana: tarot card orderings from quantum or sensor entropy")]
#[command(version = arcana_core::VERSION)]
struct Cli {
    /// JSON engine config (QRNG endpoint, timeouts, sensors)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a reading
    Draw {
        /// single, past-present-future, horseshoe, celtic-cross
        #[arg(long, default_value = "past-present-future")]
        spread: SpreadType,

        /// full (78 cards) or major (22 cards)
        #[arg(long, default_value = "full")]
        deck: DeckType,

        /// quantum (falls back to sensors on failure) or cosmic
        #[arg(long, default_value = "quantum")]
        mode: RandomMode,

        /// Keep every card upright
        #[arg(long)]
        no_reversed: bool,

        /// Card and position language: fr or en
        #[arg(long, default_value = "fr")]
        lang: Language,

        /// Print the full reading as JSON
        #[arg(long)]
        json: bool,

        /// Save the reading into this history directory
        #[arg(long)]
        save: Option<String>,
    },

    /// Re-derive a saved reading from its recorded entropy
    Verify {
        /// Path to a reading JSON file
        path: String,
    },

    /// List saved readings, newest first
    History {
        /// History directory
        #[arg(long, default_value = "readings")]
        dir: String,
    },

    /// Show the built-in spreads and their positions
    Spreads {
        #[arg(long, default_value = "fr")]
        lang: Language,
    },

    /// List the card catalog
    Deck {
        /// Major Arcana only
        #[arg(long)]
        major: bool,

        #[arg(long, default_value = "fr")]
        lang: Language,
    },

    /// Run the shuffle fairness battery on locally generated entropy
    Bias {
        /// Number of shuffles
        #[arg(long, default_value = "20000")]
        trials: usize,

        /// full or major
        #[arg(long, default_value = "full")]
        deck: DeckType,

        /// Which shuffle variant to drive
        #[arg(long, default_value = "digest", value_parser = ["digest", "numbers"])]
        source: String,
    },

    /// Start the HTTP reading server
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8042")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match commands::load_config(cli.config.as_deref()) {
        Ok(engine) => dispatch(cli.command, &engine),
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn dispatch(command: Commands, engine: &arcana_core::EngineConfig) -> commands::CliResult {
    match command {
        Commands::Draw {
            spread,
            deck,
            mode,
            no_reversed,
            lang,
            json,
            save,
        } => commands::draw::run(
            engine,
            commands::draw::DrawCommandConfig {
                spread,
                deck,
                mode,
                allow_reversed: !no_reversed,
                language: lang,
                json,
                save_dir: save.as_deref(),
            },
        ),
        Commands::Verify { path } => commands::verify::run(&path),
        Commands::History { dir } => commands::history::run(&dir),
        Commands::Spreads { lang } => commands::spreads::run(lang),
        Commands::Deck { major, lang } => commands::deck::run(major, lang),
        Commands::Bias {
            trials,
            deck,
            source,
        } => commands::bias::run(trials, deck, &source),
        Commands::Server { port, host } => commands::server::run(engine, &host, port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_draw_arguments_parse() {
        let cli = Cli::try_parse_from([
            "arcana",
            "draw",
            "--spread",
            "celtic-cross",
            "--deck",
            "major",
            "--mode",
            "cosmic",
            "--lang",
            "en",
            "--no-reversed",
        ])
        .unwrap();
        match cli.command {
            Commands::Draw {
                spread,
                deck,
                mode,
                no_reversed,
                lang,
                ..
            } => {
                assert_eq!(spread, SpreadType::CelticCross);
                assert_eq!(deck, DeckType::MajorOnly);
                assert_eq!(mode, RandomMode::Cosmic);
                assert!(no_reversed);
                assert_eq!(lang, Language::En);
            }
            _ => panic!("expected draw"),
        }
    }

    #[test]
    fn test_unknown_spread_rejected() {
        assert!(Cli::try_parse_from(["arcana", "draw", "--spread", "pentagram"]).is_err());
        assert!(Cli::try_parse_from(["arcana", "bias", "--source", "dice"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["arcana", "spreads", "--config", "engine.json"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("engine.json"));
    }
}
