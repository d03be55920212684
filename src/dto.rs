use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::StudyError;
use crate::models::{Flashcard, ParseRatingError, Rating, StudyRecord};
use crate::scheduler::ScheduleState;

/// Session size used when the request does not name one
pub const DEFAULT_SESSION_LIMIT: i64 = 20;

/// Largest session a client may request
pub const MAX_SESSION_LIMIT: i64 = 50;

/// Distinguishes an omitted field (`None`) from an explicit `null` (`Some(None)`)
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn require_non_blank(field: &str, value: &str) -> Result<(), StudyError> {
    if value.trim().is_empty() {
        return Err(StudyError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Data transfer object for creating a new deck
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateDeckDto {
    /// The name of the deck
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateDeckDto {
    pub fn validate(&self) -> Result<(), StudyError> {
        require_non_blank("name", &self.name)
    }
}

/// Data transfer object for creating a new flashcard
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateFlashcardDto {
    /// Question side
    pub front: String,

    /// Answer side
    pub back: String,

    /// Whether the card came from AI generation
    #[serde(default)]
    pub ai_generated: bool,
}

impl CreateFlashcardDto {
    pub fn validate(&self) -> Result<(), StudyError> {
        require_non_blank("front", &self.front)?;
        require_non_blank("back", &self.back)
    }
}

/// Data transfer object for editing a flashcard's content
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct UpdateFlashcardDto {
    /// New question side
    pub front: Option<String>,

    /// New answer side
    pub back: Option<String>,
}

impl UpdateFlashcardDto {
    pub fn validate(&self) -> Result<(), StudyError> {
        if self.front.is_none() && self.back.is_none() {
            return Err(StudyError::Validation("nothing to update".to_string()));
        }
        if let Some(front) = &self.front {
            require_non_blank("front", front)?;
        }
        if let Some(back) = &self.back {
            require_non_blank("back", back)?;
        }
        Ok(())
    }
}

/// Data transfer object for starting a study session
#[derive(Serialize, Deserialize, Debug)]
pub struct StartSessionDto {
    /// The deck to study
    pub deck_id: String,

    /// Maximum number of cards to return (1-50, default 20)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl StartSessionDto {
    /// Returns the effective session limit, rejecting values outside 1-50
    pub fn validated_limit(&self) -> Result<i64, StudyError> {
        require_non_blank("deck_id", &self.deck_id)?;
        match self.limit {
            None => Ok(DEFAULT_SESSION_LIMIT),
            Some(limit) if (1..=MAX_SESSION_LIMIT).contains(&limit) => Ok(limit),
            Some(limit) => Err(StudyError::Validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_SESSION_LIMIT, limit
            ))),
        }
    }
}

/// Data transfer object for submitting a review
#[derive(Serialize, Deserialize, Debug)]
pub struct SubmitReviewDto {
    /// The study record being reviewed
    pub study_record_id: String,

    /// The flashcard the client believes the record belongs to
    pub flashcard_id: String,

    /// One of `again`, `good`, `easy`
    pub rating: String,

    /// When present, the review only applies if the record's last review date
    /// still equals this value (`null` for a never-reviewed record)
    #[serde(default, deserialize_with = "deserialize_present", skip_serializing_if = "Option::is_none")]
    pub expected_last_review_date: Option<Option<DateTime<Utc>>>,
}

impl SubmitReviewDto {
    pub fn parse_rating(&self) -> Result<Rating, ParseRatingError> {
        self.rating.parse()
    }

    pub fn validate_ids(&self) -> Result<(), StudyError> {
        require_non_blank("study_record_id", &self.study_record_id)?;
        require_non_blank("flashcard_id", &self.flashcard_id)
    }
}

/// A card due in a study session, with its current scheduling state
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DueCardDto {
    pub study_record_id: String,
    pub flashcard_id: String,
    pub deck_id: String,
    pub front: String,
    pub back: String,
    pub ai_generated: bool,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub next_review_date: DateTime<Utc>,
    pub last_review_date: Option<DateTime<Utc>>,
}

impl DueCardDto {
    pub fn new(record: &StudyRecord, flashcard: &Flashcard) -> Self {
        Self {
            study_record_id: record.get_id(),
            flashcard_id: flashcard.get_id(),
            deck_id: flashcard.get_deck_id(),
            front: flashcard.get_front(),
            back: flashcard.get_back(),
            ai_generated: flashcard.is_ai_generated(),
            ease_factor: record.get_ease_factor(),
            interval_days: record.get_interval_days(),
            repetitions: record.get_repetitions(),
            next_review_date: record.get_next_review_date(),
            last_review_date: record.get_last_review_date(),
        }
    }
}

/// Response to starting a study session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudySessionDto {
    /// Due cards, oldest due first, at most `limit` of them
    pub due_cards: Vec<DueCardDto>,

    /// Number of due cards in the deck before the limit was applied
    pub total_due: i64,
}

/// Response to a submitted review
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewOutcomeDto {
    pub study_record_id: String,
    pub flashcard_id: String,
    pub rating: Rating,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub next_review_date: DateTime<Utc>,
    pub last_review_date: Option<DateTime<Utc>>,
}

impl ReviewOutcomeDto {
    pub fn new(record: &StudyRecord, rating: Rating) -> Self {
        Self {
            study_record_id: record.get_id(),
            flashcard_id: record.get_flashcard_id(),
            rating,
            ease_factor: record.get_ease_factor(),
            interval_days: record.get_interval_days(),
            repetitions: record.get_repetitions(),
            next_review_date: record.get_next_review_date(),
            last_review_date: record.get_last_review_date(),
        }
    }
}

/// What a rating would do to a record, without applying it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewPreviewDto {
    pub rating: Rating,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub next_review_date: DateTime<Utc>,
}

impl ReviewPreviewDto {
    pub fn new(rating: Rating, state: &ScheduleState) -> Self {
        Self {
            rating,
            ease_factor: state.ease_factor,
            interval_days: state.interval_days,
            next_review_date: state.next_review_date,
        }
    }
}

/// Study progress summary for one deck
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeckStatsDto {
    pub deck_id: String,
    /// Flashcards in the deck
    pub total_cards: i64,
    /// Flashcards never reviewed
    pub new_cards: i64,
    /// Flashcards due now (cards without a record count as due)
    pub due_cards: i64,
    /// Flashcards reviewed at least once
    pub reviewed_cards: i64,
    /// Mean ease factor over existing study records
    pub average_ease_factor: Option<f64>,
}

#[cfg(test)]
mod tests;
