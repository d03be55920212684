use clap::ValueEnum;
use flashdeck::dto::{DeckStatsDto, ReviewOutcomeDto, ReviewPreviewDto, StudySessionDto};
use flashdeck::models::{Deck, Flashcard, ReviewLog};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or counts)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

/// Shortens card text for table cells
fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let cut: String = single_line.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// Prints a list of decks in the specified format
pub fn print_decks(decks: &[Deck], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if decks.is_empty() {
                if !config.quiet {
                    println!("No decks found.");
                }
                return;
            }
            if config.quiet {
                for deck in decks {
                    println!("{}", deck.get_id());
                }
                return;
            }
            let max_id = decks.iter().map(|d| d.get_id().len()).max().unwrap_or(2);
            println!("{:<width$}  NAME", "ID", width = max_id);
            for deck in decks {
                println!("{:<width$}  {}", deck.get_id(), deck.get_name(), width = max_id);
            }
        }
        OutputFormat::Json => print_json(decks),
    }
}

/// Prints a single deck in the specified format
pub fn print_deck(deck: &Deck, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", deck.get_id());
                return;
            }
            println!("ID:          {}", deck.get_id());
            println!("Name:        {}", deck.get_name());
            if let Some(description) = deck.get_description() {
                println!("Description: {}", description);
            }
            println!("Created:     {}", deck.get_created_at());
        }
        OutputFormat::Json => print_json(deck),
    }
}

/// Prints deck statistics in the specified format
pub fn print_deck_stats(stats: &DeckStatsDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", stats.due_cards);
                return;
            }
            println!("Cards:       {}", stats.total_cards);
            println!("New:         {}", stats.new_cards);
            println!("Due now:     {}", stats.due_cards);
            println!("Reviewed:    {}", stats.reviewed_cards);
            match stats.average_ease_factor {
                Some(ease) => println!("Avg. ease:   {:.2}", ease),
                None => println!("Avg. ease:   -"),
            }
        }
        OutputFormat::Json => print_json(stats),
    }
}

/// Prints a list of flashcards in the specified format
pub fn print_flashcards(cards: &[Flashcard], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if cards.is_empty() {
                if !config.quiet {
                    println!("No flashcards found.");
                }
                return;
            }
            if config.quiet {
                for card in cards {
                    println!("{}", card.get_id());
                }
                return;
            }
            let max_id = cards.iter().map(|c| c.get_id().len()).max().unwrap_or(2);
            println!("{:<width$}  {:<40}  {:<3}  BACK", "ID", "FRONT", "AI", width = max_id);
            for card in cards {
                println!(
                    "{:<width$}  {:<40}  {:<3}  {}",
                    card.get_id(),
                    truncate(&card.get_front(), 40),
                    if card.is_ai_generated() { "yes" } else { "" },
                    truncate(&card.get_back(), 40),
                    width = max_id,
                );
            }
        }
        OutputFormat::Json => print_json(cards),
    }
}

/// Prints a single flashcard in the specified format
pub fn print_flashcard(card: &Flashcard, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", card.get_id());
                return;
            }
            println!("ID:      {}", card.get_id());
            println!("Deck:    {}", card.get_deck_id());
            println!("Front:   {}", card.get_front());
            println!("Back:    {}", card.get_back());
            println!("AI:      {}", card.is_ai_generated());
            println!("Updated: {}", card.get_updated_at());
        }
        OutputFormat::Json => print_json(card),
    }
}

/// Prints a study session in the specified format
pub fn print_session(session: &StudySessionDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                for card in &session.due_cards {
                    println!("{}", card.study_record_id);
                }
                return;
            }
            if session.due_cards.is_empty() {
                println!("Nothing due. Come back later.");
                return;
            }
            println!("{} of {} due cards", session.due_cards.len(), session.total_due);
            let max_id = session.due_cards.iter().map(|c| c.study_record_id.len()).max().unwrap_or(6);
            println!("{:<width$}  {:<40}  {:>4}  {:>5}  DUE", "RECORD", "FRONT", "REPS", "EASE", width = max_id);
            for card in &session.due_cards {
                println!(
                    "{:<width$}  {:<40}  {:>4}  {:>5.2}  {}",
                    card.study_record_id,
                    truncate(&card.front, 40),
                    card.repetitions,
                    card.ease_factor,
                    card.next_review_date.format("%Y-%m-%d %H:%M"),
                    width = max_id,
                );
            }
        }
        OutputFormat::Json => print_json(session),
    }
}

/// Prints the outcome of a review in the specified format
pub fn print_review_outcome(outcome: &ReviewOutcomeDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", outcome.next_review_date.to_rfc3339());
                return;
            }
            println!("Rated {}: next review in {} day(s), on {}",
                outcome.rating,
                outcome.interval_days,
                outcome.next_review_date.format("%Y-%m-%d %H:%M"));
            println!("Ease {:.2}, {} consecutive recall(s)", outcome.ease_factor, outcome.repetitions);
        }
        OutputFormat::Json => print_json(outcome),
    }
}

/// Prints the review history of a study record in the specified format
pub fn print_review_logs(logs: &[ReviewLog], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if logs.is_empty() {
                if !config.quiet {
                    println!("No reviews yet.");
                }
                return;
            }
            if config.quiet {
                println!("{}", logs.len());
                return;
            }
            println!("{:<16}  {:<6}  {:>8}  {:>5}  REPS", "REVIEWED", "RATING", "INTERVAL", "EASE");
            for log in logs {
                println!(
                    "{:<16}  {:<6}  {:>8}  {:>5.2}  {}",
                    log.get_reviewed_at().format("%Y-%m-%d %H:%M"),
                    log.get_rating(),
                    log.get_interval_days(),
                    log.get_ease_factor(),
                    log.get_repetitions(),
                );
            }
        }
        OutputFormat::Json => print_json(logs),
    }
}

/// Prints the effect of each rating on a study record
pub fn print_previews(previews: &[ReviewPreviewDto], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            for preview in previews {
                if config.quiet {
                    println!("{} {}", preview.rating, preview.interval_days);
                } else {
                    println!("{:<6}  {:>5} day(s)  ease {:.2}", preview.rating, preview.interval_days, preview.ease_factor);
                }
            }
        }
        OutputFormat::Json => print_json(previews),
    }
}

/// Prints a success message in the specified format
pub fn print_success(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({"status": "ok", "message": message})),
    }
}
