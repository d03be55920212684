use clap::Subcommand;

use crate::client::FlashdeckClient;
use crate::output::{self, OutputConfig};

/// Deck management commands
#[derive(Subcommand, Debug)]
pub enum DeckCommands {
    /// List your decks
    List,
    /// Create a new deck
    Create {
        /// The deck name
        #[clap(long)]
        name: String,
        /// Optional description
        #[clap(long)]
        description: Option<String>,
    },
    /// Get a specific deck by ID
    Get {
        /// The deck ID
        id: String,
    },
    /// Delete a deck with all its flashcards and study progress
    Delete {
        /// The deck ID
        id: String,
    },
    /// Show study statistics for a deck
    Stats {
        /// The deck ID
        id: String,
    },
}

/// Executes a deck command
pub async fn execute(
    client: &FlashdeckClient,
    cmd: DeckCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        DeckCommands::List => {
            let decks = client.list_decks().await?;
            output::print_decks(&decks, config);
        }
        DeckCommands::Create { name, description } => {
            let deck = client.create_deck(name, description).await?;
            output::print_deck(&deck, config);
        }
        DeckCommands::Get { id } => {
            let deck = client.get_deck(&id).await?;
            output::print_deck(&deck, config);
        }
        DeckCommands::Delete { id } => {
            client.delete_deck(&id).await?;
            output::print_success(&format!("Deleted deck {}", id), config);
        }
        DeckCommands::Stats { id } => {
            let stats = client.deck_stats(&id).await?;
            output::print_deck_stats(&stats, config);
        }
    }
    Ok(())
}
