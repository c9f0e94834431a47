//! Durable storage of game records.
//!
//! [`GameRepository`] is the seam the pipeline and query surface are written
//! against; [`sqlite`] is the only backend.

pub mod sqlite;
pub mod traits;

pub use sqlite::{Database, SqliteGameRepository};
pub use traits::GameRepository;

/// Errors from the persistence layer.
///
/// Any of these aborts a collection run: continuing would silently drop
/// games that were extracted successfully.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored game {game_id} is corrupt: {reason}")]
    Corrupt { game_id: String, reason: String },
    #[error("refusing to store invalid record: {0}")]
    InvalidRecord(#[from] chess::RecordError),
}
