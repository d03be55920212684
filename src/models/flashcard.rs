use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One question/answer pair belonging to a deck
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::flashcards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Flashcard {
    /// Unique identifier for the flashcard (UUID v4 as string)
    id: String,

    /// The deck this flashcard belongs to
    deck_id: String,

    /// Question side
    front: String,

    /// Answer side
    back: String,

    /// Whether the card was produced by AI generation rather than typed in
    ai_generated: bool,

    /// When this flashcard was created
    created_at: NaiveDateTime,

    /// When the content was last edited
    updated_at: NaiveDateTime,
}

impl Flashcard {
    /// Creates a new flashcard in a deck
    ///
    /// ### Arguments
    ///
    /// * `deck_id` - The deck the card belongs to
    /// * `front` - Question side
    /// * `back` - Answer side
    /// * `ai_generated` - Whether the card came from AI generation
    pub fn new(deck_id: String, front: String, back: String, ai_generated: bool) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            deck_id,
            front,
            back,
            ai_generated,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_deck_id(&self) -> String {
        self.deck_id.clone()
    }

    pub fn get_front(&self) -> String {
        self.front.clone()
    }

    pub fn get_back(&self) -> String {
        self.back.clone()
    }

    pub fn is_ai_generated(&self) -> bool {
        self.ai_generated
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at.and_utc()
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at.and_utc()
    }

    /// Replaces the card content; the deck and origin never change
    ///
    /// ### Arguments
    ///
    /// * `front` - New question side, if it changes
    /// * `back` - New answer side, if it changes
    /// * `now` - Edit timestamp
    pub fn edit(&mut self, front: Option<String>, back: Option<String>, now: DateTime<Utc>) {
        if let Some(front) = front {
            self.front = front;
        }
        if let Some(back) = back {
            self.back = back;
        }
        self.updated_at = now.naive_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_flashcard_new() {
        let card = Flashcard::new("deck-1".to_string(), "hola".to_string(), "hello".to_string(), true);

        assert!(Uuid::parse_str(&card.get_id()).is_ok());
        assert_eq!(card.get_deck_id(), "deck-1");
        assert_eq!(card.get_front(), "hola");
        assert_eq!(card.get_back(), "hello");
        assert!(card.is_ai_generated());
    }

    #[test]
    fn test_flashcard_edit_keeps_untouched_side() {
        let mut card = Flashcard::new("deck-1".to_string(), "hola".to_string(), "hello".to_string(), false);
        let later = card.get_created_at() + Duration::minutes(5);

        card.edit(None, Some("hi".to_string()), later);

        assert_eq!(card.get_front(), "hola");
        assert_eq!(card.get_back(), "hi");
        assert_eq!(card.get_updated_at(), later);
        assert!(card.get_created_at() < card.get_updated_at());
    }
}
