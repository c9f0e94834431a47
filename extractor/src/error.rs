//! Error types for review extraction

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain page content from a [`crate::PageSource`].
#[derive(Error, Debug)]
pub enum PageError {
    #[error("no review page for game {game_id} at {path}")]
    NotFound { game_id: String, path: PathBuf },

    #[error("game id {0:?} cannot name a page")]
    InvalidId(String),

    #[error("no page is open")]
    NotOpened,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mock response not configured for: {0}")]
    NotConfigured(String),
}

/// Why a single game could not be extracted.
///
/// Every variant is local to one game: the caller skips the game and
/// carries on.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("review for game {game_id} did not complete within {waited:?}")]
    Timeout { game_id: String, waited: Duration },

    #[error("could not resolve either player for game {game_id}")]
    MissingPlayers { game_id: String },

    #[error("game {game_id} has unknown result marker {marker:?}")]
    UnknownResult {
        game_id: String,
        marker: Option<String>,
    },

    #[error("extracted record is invalid: {0}")]
    Invalid(#[from] chess::RecordError),

    #[error("page unavailable: {0}")]
    Page(#[from] PageError),
}

impl ExtractionError {
    /// Short machine-friendly reason, used when reporting skipped games.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::MissingPlayers { .. } => "missing-players",
            Self::UnknownResult { .. } => "unknown-result",
            Self::Invalid(_) => "invalid-record",
            Self::Page(_) => "page-unavailable",
        }
    }
}
