use chrono::{DateTime, Utc};
use flashdeck::auth::USER_ID_HEADER;
use flashdeck::dto::{
    CreateDeckDto, CreateFlashcardDto, DeckStatsDto, ReviewOutcomeDto, ReviewPreviewDto,
    StartSessionDto, StudySessionDto, SubmitReviewDto, UpdateFlashcardDto,
};
use flashdeck::models::{Deck, Flashcard, Rating, ReviewLog};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for CLI client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    #[error("Server error ({}): {message}", .status.as_u16())]
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body.get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// HTTP client wrapper for communicating with the flashdeck server
pub struct FlashdeckClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// Sent as the user identity header on every request
    user_id: Option<String>,
    /// The underlying HTTP client
    client: Client,
}

impl FlashdeckClient {
    /// Creates a new FlashdeckClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the flashdeck server
    /// * `user_id` - The user to act as; requests without one are rejected by the server
    pub fn new(base_url: String, user_id: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
            client: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, &url);
        match &self.user_id {
            Some(user_id) => builder.header(USER_ID_HEADER, user_id),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?.check().await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        builder.send().await?.check().await?;
        Ok(())
    }

    // ── Deck endpoints ───────────────────────────────────────────────

    /// Lists the user's decks
    pub async fn list_decks(&self) -> Result<Vec<Deck>, ClientError> {
        self.send_json(self.request(Method::GET, "/decks")).await
    }

    /// Creates a new deck
    pub async fn create_deck(&self, name: String, description: Option<String>) -> Result<Deck, ClientError> {
        let dto = CreateDeckDto { name, description };
        self.send_json(self.request(Method::POST, "/decks").json(&dto)).await
    }

    /// Gets a deck by ID
    pub async fn get_deck(&self, id: &str) -> Result<Deck, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/decks/{}", id))).await
    }

    /// Deletes a deck with its flashcards
    pub async fn delete_deck(&self, id: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/decks/{}", id))).await
    }

    /// Gets the study statistics of a deck
    pub async fn deck_stats(&self, id: &str) -> Result<DeckStatsDto, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/decks/{}/stats", id))).await
    }

    // ── Flashcard endpoints ──────────────────────────────────────────

    /// Lists the flashcards of a deck
    pub async fn list_flashcards(&self, deck_id: &str) -> Result<Vec<Flashcard>, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/decks/{}/flashcards", deck_id))).await
    }

    /// Adds a flashcard to a deck
    pub async fn create_flashcard(
        &self,
        deck_id: &str,
        front: String,
        back: String,
        ai_generated: bool,
    ) -> Result<Flashcard, ClientError> {
        let dto = CreateFlashcardDto { front, back, ai_generated };
        self.send_json(self.request(Method::POST, &format!("/decks/{}/flashcards", deck_id)).json(&dto)).await
    }

    /// Edits a flashcard's front and/or back
    pub async fn update_flashcard(
        &self,
        id: &str,
        front: Option<String>,
        back: Option<String>,
    ) -> Result<Flashcard, ClientError> {
        let dto = UpdateFlashcardDto { front, back };
        self.send_json(self.request(Method::PATCH, &format!("/flashcards/{}", id)).json(&dto)).await
    }

    /// Deletes a flashcard
    pub async fn delete_flashcard(&self, id: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/flashcards/{}", id))).await
    }

    // ── Study endpoints ──────────────────────────────────────────────

    /// Starts a study session for a deck
    pub async fn start_session(&self, deck_id: String, limit: Option<i64>) -> Result<StudySessionDto, ClientError> {
        let dto = StartSessionDto { deck_id, limit };
        self.send_json(self.request(Method::POST, "/study/sessions").json(&dto)).await
    }

    /// Submits a review
    ///
    /// `expected_last_review_date` turns on the server's stale-review check:
    /// `Some(None)` asserts the record was never reviewed.
    pub async fn submit_review(
        &self,
        study_record_id: String,
        flashcard_id: String,
        rating: Rating,
        expected_last_review_date: Option<Option<DateTime<Utc>>>,
    ) -> Result<ReviewOutcomeDto, ClientError> {
        let dto = SubmitReviewDto {
            study_record_id,
            flashcard_id,
            rating: rating.to_string(),
            expected_last_review_date,
        };
        self.send_json(self.request(Method::POST, "/study/reviews").json(&dto)).await
    }

    /// Lists the review history of a study record
    pub async fn list_reviews(&self, study_record_id: &str) -> Result<Vec<ReviewLog>, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/study/records/{}/reviews", study_record_id))).await
    }

    /// Shows what each rating would do to a study record
    pub async fn preview(&self, study_record_id: &str) -> Result<Vec<ReviewPreviewDto>, ClientError> {
        self.send_json(self.request(Method::GET, &format!("/study/records/{}/preview", study_record_id))).await
    }
}
