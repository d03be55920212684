use crate::*;
use crate::models::Rating;
use crate::scheduler::{ScheduleState, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR};
use proptest::prelude::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, Utc};
use diesel::RunQueryDsl;
use std::sync::Arc;
use tower::ServiceExt;

/// Sets up a test database with migrations applied
///
/// This function:
/// 1. Creates an in-memory SQLite database
/// 2. Runs all migrations to set up the schema
///
/// Foreign keys are switched on by the pool for every connection.
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<db::DbPool> {
    // Plain ":memory:" gives each pooled connection its own database; a unique
    // shared-cache URI keeps one database per test visible to the whole pool.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");
    drop(conn);

    Arc::new(pool)
}

use diesel::sql_types::Text;
use diesel::QueryableByName;

#[derive(QueryableByName, Debug)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Tests the setup_test_db function
///
/// This test verifies that:
/// 1. The test database can be created and connected to
/// 2. The database has the expected tables
/// 3. The app can serve a request against it
#[tokio::test]
async fn test_setup_test_db() {
    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();

    let table_names: Vec<TableName> = diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
        .load(&mut conn)
        .expect("Failed to load table names");

    let expected_tables = vec![
        "decks", "flashcards", "study_records", "review_logs",
        "__diesel_schema_migrations",
    ];

    for table in expected_tables {
        let exists = table_names.iter().any(|t| t.name == table);
        assert!(exists, "Table '{}' not found in database", table);

        let query = format!("SELECT COUNT(*) FROM {}", table);
        let result = diesel::sql_query(&query).execute(&mut conn);
        assert!(result.is_ok(), "Failed to query table '{}': {:?}", table, result.err());
    }

    drop(conn);

    let app = create_app(pool.clone());
    let request = Request::builder()
        .uri("/decks")
        .method("GET")
        .header(auth::USER_ID_HEADER, "user-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Generates an arbitrary DateTime<Utc> within 2020-01-01 to 2030-01-01
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64)
        .prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap())
}

/// Generates one of the three ratings
pub fn arb_rating() -> impl Strategy<Value = Rating> {
    prop_oneof![
        Just(Rating::Again),
        Just(Rating::Good),
        Just(Rating::Easy),
    ]
}

/// Generates an ease factor in [1.3, 5.0) via integer division
pub fn arb_ease_factor() -> impl Strategy<Value = f64> {
    (1300u32..5000u32).prop_map(|v| v as f64 / 1000.0)
}

/// Generates a reachable scheduling state
///
/// Repetitions stay small enough that adding one never overflows, and
/// interval and repetitions are both zero only for a never-reviewed card.
pub fn arb_schedule_state() -> impl Strategy<Value = ScheduleState> {
    prop_oneof![
        arb_datetime_utc().prop_map(ScheduleState::initial),
        (
            arb_ease_factor(),
            1i32..=MAX_INTERVAL_DAYS,
            0i32..1000,
            arb_datetime_utc(),
        ).prop_map(|(ease_factor, interval_days, repetitions, last)| {
            ScheduleState {
                ease_factor: ease_factor.max(MIN_EASE_FACTOR),
                interval_days,
                repetitions,
                next_review_date: last + Duration::days(interval_days as i64),
                last_review_date: Some(last),
            }
        }),
    ]
}

/// Generates a sequence of ratings, as a user would give over many sessions
pub fn arb_rating_history(max_len: usize) -> impl Strategy<Value = Vec<Rating>> {
    prop::collection::vec(arb_rating(), 0..max_len)
}
