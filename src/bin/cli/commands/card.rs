use clap::Subcommand;

use crate::client::FlashdeckClient;
use crate::output::{self, OutputConfig};

/// Flashcard management commands
#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// List the flashcards of a deck
    List {
        /// The deck ID
        deck_id: String,
    },
    /// Add a flashcard to a deck
    Add {
        /// The deck ID
        deck_id: String,
        /// Question side
        #[clap(long)]
        front: String,
        /// Answer side
        #[clap(long)]
        back: String,
        /// Mark the card as AI-generated
        #[clap(long)]
        ai_generated: bool,
    },
    /// Edit a flashcard's front and/or back
    Edit {
        /// The flashcard ID
        id: String,
        /// New question side
        #[clap(long)]
        front: Option<String>,
        /// New answer side
        #[clap(long)]
        back: Option<String>,
    },
    /// Delete a flashcard and its study progress
    Delete {
        /// The flashcard ID
        id: String,
    },
}

/// Executes a flashcard command
pub async fn execute(
    client: &FlashdeckClient,
    cmd: CardCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        CardCommands::List { deck_id } => {
            let cards = client.list_flashcards(&deck_id).await?;
            output::print_flashcards(&cards, config);
        }
        CardCommands::Add { deck_id, front, back, ai_generated } => {
            let card = client.create_flashcard(&deck_id, front, back, ai_generated).await?;
            output::print_flashcard(&card, config);
        }
        CardCommands::Edit { id, front, back } => {
            if front.is_none() && back.is_none() {
                return Err("Nothing to edit: pass --front and/or --back".into());
            }
            let card = client.update_flashcard(&id, front, back).await?;
            output::print_flashcard(&card, config);
        }
        CardCommands::Delete { id } => {
            client.delete_flashcard(&id).await?;
            output::print_success(&format!("Deleted flashcard {}", id), config);
        }
    }
    Ok(())
}
