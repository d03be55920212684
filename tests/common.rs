//! Common test utilities for flashdeck integration tests
//!
//! This file contains shared functions for all integration tests: test
//! application setup, a request helper that sends the user identity header,
//! and helpers for creating decks, flashcards and sessions through the API.

#![allow(dead_code)]

use flashdeck::{create_app, db::init_pool};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Creates a test application with an in-memory SQLite database
///
/// This helper function:
/// 1. Creates a shared in-memory SQLite database unique to this call
/// 2. Runs migrations to set up the schema
/// 3. Creates an Axum application with the database
///
/// ### Returns
///
/// An Axum Router configured with all routes and connected to an in-memory database
pub fn create_test_app() -> Router {
    let database_url = format!("file:itest_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url).unwrap());

    let conn = &mut pool.get().unwrap();
    flashdeck::run_migrations(conn).unwrap();

    create_app(pool.clone())
}

/// Sends a request and returns the status with the parsed JSON body
///
/// ### Arguments
///
/// * `app` - The test application
/// * `method` - HTTP method
/// * `uri` - Request path
/// * `user` - Value of the user identity header, or `None` to omit it
/// * `body` - JSON body, or `None` for an empty body
///
/// ### Returns
///
/// The response status and its body (`Value::Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Creates a deck via the API and returns its ID
pub async fn create_deck(app: &Router, user: &str, name: &str) -> String {
    let (status, deck) = send(app, Method::POST, "/decks", Some(user), Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::OK, "create deck failed: {}", deck);
    deck["id"].as_str().unwrap().to_string()
}

/// Creates a flashcard via the API and returns its ID
pub async fn create_flashcard(app: &Router, user: &str, deck_id: &str, front: &str, back: &str) -> String {
    let (status, card) = send(
        app,
        Method::POST,
        &format!("/decks/{}/flashcards", deck_id),
        Some(user),
        Some(json!({ "front": front, "back": back })),
    ).await;
    assert_eq!(status, StatusCode::OK, "create flashcard failed: {}", card);
    card["id"].as_str().unwrap().to_string()
}

/// Starts a study session via the API
pub async fn start_session(app: &Router, user: &str, deck_id: &str, limit: Option<i64>) -> (StatusCode, Value) {
    let mut body = json!({ "deck_id": deck_id });
    if let Some(limit) = limit {
        body["limit"] = json!(limit);
    }
    send(app, Method::POST, "/study/sessions", Some(user), Some(body)).await
}

/// Submits a review via the API
pub async fn submit_review(app: &Router, user: &str, record_id: &str, flashcard_id: &str, rating: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/study/reviews",
        Some(user),
        Some(json!({
            "study_record_id": record_id,
            "flashcard_id": flashcard_id,
            "rating": rating,
        })),
    ).await
}
