use chrono::{DateTime, Utc};
use clap::Subcommand;
use flashdeck::models::Rating;

use crate::client::FlashdeckClient;
use crate::output::{self, OutputConfig};

/// Study commands
#[derive(Subcommand, Debug)]
pub enum StudyCommands {
    /// Start a session and list the cards due now
    Session {
        /// The deck ID
        deck_id: String,
        /// Maximum number of cards (1-50, server default 20)
        #[clap(long)]
        limit: Option<i64>,
    },
    /// Submit a review for a study record
    Review {
        /// The study record ID
        #[clap(long)]
        record: String,
        /// The flashcard ID the record belongs to
        #[clap(long)]
        card: String,
        /// again, good or easy
        #[clap(long)]
        rating: Rating,
        /// Only apply if the record's last review is still this one
        /// (RFC 3339, or "never" for an unreviewed record)
        #[clap(long, value_parser = parse_expected_review)]
        expect_last_review: Option<ExpectedReview>,
    },
    /// Show the review history of a study record
    History {
        /// The study record ID
        record: String,
    },
    /// Show what each rating would do to a study record
    Preview {
        /// The study record ID
        record: String,
    },
}

/// The last review date a client expects a record to have
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedReview(Option<DateTime<Utc>>);

fn parse_expected_review(s: &str) -> Result<ExpectedReview, String> {
    if s.eq_ignore_ascii_case("never") {
        return Ok(ExpectedReview(None));
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| ExpectedReview(Some(dt.with_timezone(&Utc))))
        .map_err(|e| format!("expected an RFC 3339 date or \"never\": {}", e))
}

/// Executes a study command
pub async fn execute(
    client: &FlashdeckClient,
    cmd: StudyCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        StudyCommands::Session { deck_id, limit } => {
            let session = client.start_session(deck_id, limit).await?;
            output::print_session(&session, config);
        }
        StudyCommands::Review { record, card, rating, expect_last_review } => {
            let expected = expect_last_review.map(|e| e.0);
            let outcome = client.submit_review(record, card, rating, expected).await?;
            output::print_review_outcome(&outcome, config);
        }
        StudyCommands::History { record } => {
            let logs = client.list_reviews(&record).await?;
            output::print_review_logs(&logs, config);
        }
        StudyCommands::Preview { record } => {
            let previews = client.preview(&record).await?;
            output::print_previews(&previews, config);
        }
    }
    Ok(())
}
