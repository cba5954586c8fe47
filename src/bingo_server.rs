// src/bingo_server.rs
// Bingo scoring server: loads a card collection and serves the scoreboard over HTTP.

use clap::Parser;

use bingo::config::ServerConfig;
use bingo::game::Session;
use bingo::logging::{log_error_stderr, log_info, log_warning};
use bingo::server;
use bingo::store::CardStore;

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Bingo Server - Live scoring for a collection of bingo cards")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Folder holding one sub-folder of card files per collection
    #[arg(long)]
    cards_dir: Option<String>,

    /// Collection to load
    #[arg(short, long)]
    collection: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = ServerConfig::load_or_default();
    if let Some(cards_dir) = args.cards_dir {
        config.cards_dir = cards_dir;
    }
    if let Some(collection) = args.collection {
        config.collection = collection;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    let store = CardStore::new(&config.cards_dir, config.max_cards);
    let session = match Session::open(&store, &config.collection) {
        Ok(session) => session,
        Err(e) => {
            log_error_stderr(&format!("Cannot load collection '{}': {e}", config.collection));
            if let Ok(available) = store.collections() {
                log_warning(&format!("Available collections: {}", available.join(", ")));
            }
            std::process::exit(1);
        }
    };

    let (server_handle, shutdown_signal) = server::start_server(config, session, store);

    if let Err(e) = tokio::signal::ctrl_c().await {
        log_error_stderr(&format!("Failed to listen for Ctrl-C: {e}"));
    }

    shutdown_signal.store(true, std::sync::atomic::Ordering::Relaxed);
    log_info("Shutting down API server...");

    if let Err(e) = server_handle.await {
        log_error_stderr(&format!("Error waiting for server shutdown: {e:?}"));
    }

    log_info("API server stopped successfully.");
}
