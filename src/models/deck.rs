use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of flashcards owned by a single user
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::decks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Deck {
    /// Unique identifier for the deck (UUID v4 as string)
    id: String,

    /// The user that owns this deck
    user_id: String,

    /// Display name of the deck
    name: String,

    /// Optional free-form description
    description: Option<String>,

    /// When this deck was created
    created_at: NaiveDateTime,

    /// When this deck was last modified
    updated_at: NaiveDateTime,
}

impl Deck {
    /// Creates a new deck owned by `user_id`
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The owning user
    /// * `name` - The deck name
    /// * `description` - An optional description
    pub fn new(user_id: String, name: String, description: Option<String>) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    /// Whether `user_id` owns this deck
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_description(&self) -> Option<String> {
        self.description.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at.and_utc()
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        self.updated_at.and_utc()
    }
}
