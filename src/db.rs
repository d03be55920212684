use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// How many times a write is retried when SQLite reports a lock
const MAX_RETRIES: u32 = 5;

/// Base delay for the exponential backoff between retries
const BASE_BACKOFF_MS: u64 = 20;

/// Per-connection pragmas applied whenever the pool hands out a connection
///
/// Foreign keys are off by default in SQLite, and the cascades from
/// flashcards to study records depend on them.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the SQLite connection pool
///
/// ### Arguments
///
/// * `database_url` - Path or URI of the SQLite database
///
/// ### Errors
///
/// Returns an error if the pool cannot open its initial connections
pub fn init_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions { busy_timeout_ms: 5_000 }))
        .build(manager)?;
    Ok(pool)
}

/// Errors that can tell whether they came from a locked SQLite database
pub trait LockError {
    fn is_locked(&self) -> bool;
}

impl LockError for DieselError {
    fn is_locked(&self) -> bool {
        match self {
            DieselError::DatabaseError(_, info) => {
                let message = info.message();
                message.contains("locked") || message.contains("busy")
            }
            _ => false,
        }
    }
}

/// Runs a write, retrying with jittered exponential backoff while SQLite reports a lock
///
/// Any other error, or a lock that outlives the retry budget, is returned as is.
pub async fn execute_with_retry<T, E, F>(mut op: F) -> Result<T, E>
where
    E: LockError,
    F: FnMut() -> Result<T, E>,
{
    let mut attempt = 0;
    loop {
        match op() {
            Err(err) if attempt < MAX_RETRIES && err.is_locked() => {
                attempt += 1;
                let jitter = rand::rng().random_range(0..BASE_BACKOFF_MS);
                let delay = BASE_BACKOFF_MS * 2u64.pow(attempt) + jitter;
                warn!("Database locked, retrying in {}ms (attempt {}/{})", delay, attempt, MAX_RETRIES);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            result => return result,
        }
    }
}
