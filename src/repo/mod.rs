/// Repository module
///
/// The data access layer: decks, flashcards, and the per-user study records
/// with their review history. Reads are plain functions over a pooled
/// connection; writes go through the lock-aware retry helper in [`crate::db`].
///
/// Ownership checks live here too, so handlers can turn a missing or foreign
/// resource into the right error without touching the schema.

mod deck_repo;
mod flashcard_repo;
mod study_repo;

// Re-export all repository functions
pub use deck_repo::*;
pub use flashcard_repo::*;
pub use study_repo::*;
