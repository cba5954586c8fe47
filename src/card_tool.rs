// src/card_tool.rs
// Offline card tool: generate card files and check a collection without a server.

use std::error::Error;
use clap::{Parser, Subcommand};

use bingo::card::CardGenerator;
use bingo::config::ServerConfig;
use bingo::game::build_scoreboard;
use bingo::called::CalledSet;
use bingo::logging::{log_error_stderr, log_info, log_warning};
use bingo::store::CardStore;
use bingo::terminal;

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Bingo Cards - Generate and check card collections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Folder holding one sub-folder of card files per collection
    #[arg(long)]
    cards_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write new random cards into a collection
    Generate {
        collection: String,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Show every card of a collection scored against the given numbers
    Check {
        collection: String,
        /// Called numbers, comma separated
        #[arg(long, default_value = "")]
        called: String,
    },
    /// List the collections in the card folder
    List,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::load_or_default();
    let cards_dir = args.cards_dir.unwrap_or(config.cards_dir);
    let store = CardStore::new(&cards_dir, config.max_cards);

    match args.command {
        Command::Generate { collection, count } => {
            let generator = CardGenerator::new();
            for card in generator.generate_cards(count) {
                let index = store.next_index(&collection)?;
                let path = store.save(&collection, index, &card)?;
                log_info(&format!("Wrote {}", path.display()));
            }
        }
        Command::Check { collection, called } => {
            let cards = store.load(&collection)?;
            let mut called_set = CalledSet::new();
            let report = called_set.toggle_batch(&called);
            if let Some(warning) = report.warning() {
                log_warning(&warning);
            }
            terminal::show_scoreboard(&build_scoreboard(&cards, &called_set));
        }
        Command::List => {
            for id in store.collections()? {
                println!("{id}");
            }
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        log_error_stderr(&e.to_string());
        std::process::exit(1);
    }
}
