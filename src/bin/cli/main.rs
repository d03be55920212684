mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::{ClientError, FlashdeckClient};
use flashdeck::config;
use output::{OutputConfig, OutputFormat};
use std::process;

/// CLI for the flashdeck study server
#[derive(Parser, Debug)]
#[clap(name = "flashdeck-cli", about = "CLI for the flashdeck study server")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "FLASHDECK_URL", global = true)]
    server_url: Option<String>,

    /// User to act as
    #[clap(long, env = "FLASHDECK_USER", global = true)]
    user: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs or counts)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage decks
    #[command(subcommand)]
    Deck(commands::deck::DeckCommands),
    /// Manage flashcards
    #[command(subcommand)]
    Card(commands::card::CardCommands),
    /// Study due cards
    #[command(subcommand)]
    Study(commands::study::StudyCommands),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    if let Some(dir) = config::get_config_dir_path() {
        let config_path = dir.join("config.toml");
        if let Ok(update) = config::config_from_file(Some(config_path)) {
            if let Some(url) = update.server_url {
                return url;
            }
        }
    }

    format!("http://localhost:{}", config::DEFAULT_PORT)
}

/// Formats an error for stderr, with a hint when the server is unreachable
fn format_error(err: &(dyn std::error::Error + 'static)) -> String {
    match err.downcast_ref::<ClientError>() {
        Some(ClientError::Request(e)) if e.is_connect() || e.is_timeout() => {
            format!("Could not reach the flashdeck server. Is it running?\n  {}", err)
        }
        Some(ClientError::Server { status, message }) if status.as_u16() == 401 => {
            format!("{} (pass --user or set FLASHDECK_USER)", message)
        }
        _ => err.to_string(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let client = FlashdeckClient::new(server_url, cli.user);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Deck(cmd) => commands::deck::execute(&client, cmd, &output_config).await,
        Commands::Card(cmd) => commands::card::execute(&client, cmd, &output_config).await,
        Commands::Study(cmd) => commands::study::execute(&client, cmd, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
