//! Hand-entered games (over-the-board league games, custom analysis boards).

use crate::record::{normalize_username, GameRecord, GameResult, RecordError, RecordSource};
use crate::pgn::parse_pgn_tags;

/// Metadata typed in for a game that has no automated review.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntry {
    /// PGN-derived game code; becomes the record's `game_id`.
    pub code: String,
    pub white: String,
    pub black: String,
    /// Explicit result. Takes precedence over the PGN `[Result]` tag.
    pub result: Option<GameResult>,
    /// Raw PGN text, read for `[Result]`, `[WhiteElo]` and `[BlackElo]`.
    pub pgn: Option<String>,
}

impl ManualEntry {
    pub fn new(code: impl Into<String>, white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            white: white.into(),
            black: black.into(),
            result: None,
            pgn: None,
        }
    }

    pub fn with_result(mut self, result: GameResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_pgn(mut self, pgn: impl Into<String>) -> Self {
        self.pgn = Some(pgn.into());
        self
    }

    /// Build a record with zero tallies and unset accuracy.
    pub fn into_record(self) -> Result<GameRecord, RecordError> {
        let headers = self.pgn.as_deref().map(parse_pgn_tags).unwrap_or_default();
        let result = match (self.result, headers.result()) {
            (Some(result), _) => result,
            (None, Some(parsed)) => parsed?,
            (None, None) => return Err(RecordError::MissingResult(self.code)),
        };

        let mut record = GameRecord::new(self.code, result, RecordSource::ManualEntry)
            .with_players(Some(&self.white), Some(&self.black));
        record.ratings.white = headers.white_elo();
        record.ratings.black = headers.black_elo();
        record.validate()?;
        Ok(record)
    }

    /// Re-label a record parsed from a saved review page as this manual game.
    ///
    /// Typed usernames replace whatever the page showed (custom boards label
    /// the players "White" and "Black"); the explicit result, if any, replaces
    /// the page's result.
    pub fn apply_to(self, mut record: GameRecord) -> Result<GameRecord, RecordError> {
        record.game_id = self.code;
        record.white_username = normalize_username(Some(&self.white));
        record.black_username = normalize_username(Some(&self.black));
        if let Some(result) = self.result {
            record.result = result;
        }
        record.source = RecordSource::ManualEntry;
        record.validate()?;
        Ok(record)
    }
}
