/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// It includes database models that map to database tables, as well as methods
/// for creating and manipulating these models.

mod rating;
pub use rating::{ParseRatingError, Rating};

mod deck;
pub use deck::Deck;

mod flashcard;
pub use flashcard::Flashcard;

mod study_record;
pub use study_record::StudyRecord;

mod review_log;
pub use review_log::ReviewLog;
