// src/caller_client.rs
// Terminal client for the caller: shows every card's status and sends called numbers.
//
// Input:
// - numbers, comma separated: toggle each one (typing a called number again removes it)
// - empty line: refresh
// - :reset  clear all called numbers
// - :reload re-read the card files on the server
// - :quit   exit

use std::error::Error;
use std::io::Write;
use clap::Parser;

use bingo::client::BingoClient;
use bingo::config::ClientConfig;
use bingo::logging::log_error_stderr;
use bingo::terminal;

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Bingo Caller - Enter called numbers and watch card status")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Server address (overrides conf/client.conf)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides conf/client.conf)
    #[arg(short, long)]
    port: Option<u16>,
}

enum Command<'a> {
    Refresh,
    Reset,
    Reload,
    Quit,
    Toggle(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    match line.trim() {
        "" => Command::Refresh,
        ":reset" => Command::Reset,
        ":reload" => Command::Reload,
        ":quit" | ":q" => Command::Quit,
        input => Command::Toggle(input),
    }
}

async fn run_client(client: &BingoClient) -> Result<(), Box<dyn Error>> {
    // Message from the last action, shown under the next frame
    let mut notice: Option<String> = None;

    loop {
        let board = client.scoreboard().await?;
        terminal::clear_screen();
        terminal::show_scoreboard(&board);
        if let Some(text) = notice.take() {
            println!("{text}");
        }

        let Some(line) = terminal::prompt_line("Numbers (comma separated, :reset, :reload, :quit) > ")? else {
            break;
        };

        match parse_command(&line) {
            Command::Refresh => {}
            Command::Quit => break,
            Command::Reset => notice = Some(client.reset().await?),
            Command::Reload => notice = Some(client.reload().await?),
            Command::Toggle(input) => {
                let response = client.toggle(input).await?;
                notice = response.warning;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = ClientConfig::load_or_default();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let client = match BingoClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            log_error_stderr(&format!("Failed to create HTTP client: {e}"));
            std::process::exit(1);
        }
    };

    print!("Connecting to server at {}...", client.server_url());
    let _ = std::io::stdout().flush();
    match client.status().await {
        Ok(_) => println!(" Ok."),
        Err(e) => {
            println!(" Error.");
            log_error_stderr(&format!("Failed to connect to server: {e}"));
            std::process::exit(1);
        }
    }

    if let Err(e) = run_client(&client).await {
        log_error_stderr(&format!("Client error: {e}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command("  "), Command::Refresh));
        assert!(matches!(parse_command(":reset"), Command::Reset));
        assert!(matches!(parse_command(":q"), Command::Quit));
        assert!(matches!(parse_command(" 1, 2 "), Command::Toggle("1, 2")));
    }
}
