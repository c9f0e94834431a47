//! Turning a review snapshot into a [`GameRecord`].
//!
//! Field policy:
//!
//! | Field | Missing | Malformed |
//! |-------|---------|-----------|
//! | usernames | other side may still identify the game; both missing is fatal | n/a |
//! | tallies | zero | zero, logged |
//! | accuracy | unset | unset, logged |
//! | ratings | unset | unset, logged |
//! | result | fatal | fatal |
//!
//! Analytics with a missing accuracy are still useful; analytics attributed to
//! the wrong (or no) player are not.

use std::time::Duration;

use chess::{
    now_timestamp, parse_pgn_tags, ByColor, Color, GameRecord, ManualEntry, RecordSource, Tallies,
};

use crate::error::ExtractionError;
use crate::field::Field;
use crate::snapshot::ReviewSnapshot;
use crate::traits::{PageSource, Wait};
use crate::wait::wait_for_review;

/// Default upper bound on waiting for a review to finish computing.
pub const DEFAULT_REVIEW_TIMEOUT: Duration = Duration::from_secs(25);

/// Default time between polls of the page.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Timing of the completion wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REVIEW_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Waits for a review page to finish and extracts its record.
#[derive(Debug, Clone)]
pub struct Extractor<W> {
    config: ExtractorConfig,
    wait: W,
}

impl<W: Wait> Extractor<W> {
    pub fn new(config: ExtractorConfig, wait: W) -> Self {
        Self { config, wait }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The wait primitive, shared with the pipeline's inter-game delay.
    pub fn waiter(&self) -> &W {
        &self.wait
    }

    /// Extract the review for `game_id` from the page currently open in `page`.
    ///
    /// Nothing is written anywhere; on error the caller simply has no record.
    pub async fn extract<P: PageSource>(
        &self,
        page: &P,
        game_id: &str,
    ) -> Result<GameRecord, ExtractionError> {
        let snapshot = wait_for_review(page, &self.wait, &self.config, game_id).await?;
        snapshot.into_record(game_id, now_timestamp())
    }
}

/// Extract a record from markup that has already finished rendering
/// (for example a saved review page). No completeness check is made.
pub fn extract_from_html(
    html: &str,
    game_id: &str,
    collected_at: u64,
) -> Result<GameRecord, ExtractionError> {
    ReviewSnapshot::parse(html).into_record(game_id, collected_at)
}

/// Build a manual record from a saved review page.
///
/// Custom analysis boards show placeholder player names and usually an
/// unfinished `*` result, so the typed names and the typed (or PGN) result are
/// put in place before the field policy runs.
pub fn extract_manual_html(
    html: &str,
    entry: ManualEntry,
    collected_at: u64,
) -> Result<GameRecord, ExtractionError> {
    let mut snapshot = ReviewSnapshot::parse(html);
    snapshot.usernames = ByColor::new(Some(entry.white.clone()), Some(entry.black.clone()));
    let pgn_result = entry
        .pgn
        .as_deref()
        .and_then(|pgn| parse_pgn_tags(pgn).result())
        .and_then(Result::ok);
    if let Some(result) = entry.result.or(pgn_result) {
        snapshot.result = Field::Value(result);
    }
    let record = snapshot.into_record(&entry.code, collected_at)?;
    Ok(entry.apply_to(record)?)
}

impl ReviewSnapshot {
    /// Apply the field policy and build an automated-review record.
    pub fn into_record(
        self,
        game_id: &str,
        collected_at: u64,
    ) -> Result<GameRecord, ExtractionError> {
        if self.usernames.white.is_none() && self.usernames.black.is_none() {
            return Err(ExtractionError::MissingPlayers {
                game_id: game_id.to_string(),
            });
        }
        for color in Color::BOTH {
            if self.usernames.get(color).is_none() {
                tracing::warn!(game_id, side = %color, "Username not found on review page");
            }
        }

        let result = match self.result {
            Field::Value(result) => result,
            Field::Missing => {
                return Err(ExtractionError::UnknownResult {
                    game_id: game_id.to_string(),
                    marker: None,
                })
            }
            Field::Malformed(marker) => {
                return Err(ExtractionError::UnknownResult {
                    game_id: game_id.to_string(),
                    marker: Some(marker),
                })
            }
        };

        let mut tallies = Tallies::default();
        for (category, pair) in self.tallies {
            let counts = ByColor::new(
                soft(game_id, &format!("{category} ({})", Color::White), pair.white).unwrap_or(0),
                soft(game_id, &format!("{category} ({})", Color::Black), pair.black).unwrap_or(0),
            );
            tallies.set(category, counts);
        }

        let accuracy = ByColor::new(
            soft(game_id, "white accuracy", self.accuracy.white),
            soft(game_id, "black accuracy", self.accuracy.black),
        );
        let ratings = ByColor::new(
            soft(game_id, "white rating", self.ratings.white),
            soft(game_id, "black rating", self.ratings.black),
        );

        let record = GameRecord {
            game_id: game_id.to_string(),
            white_username: self.usernames.white,
            black_username: self.usernames.black,
            tallies,
            accuracy,
            result,
            ratings,
            source: RecordSource::AutomatedReview,
            collected_at,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Non-critical field: a bad reading degrades to unset and is logged.
fn soft<T>(game_id: &str, field: &str, value: Field<T>) -> Option<T> {
    match value {
        Field::Value(v) => Some(v),
        Field::Missing => None,
        Field::Malformed(text) => {
            tracing::warn!(game_id, field, text = %text, "Unparseable value, leaving unset");
            None
        }
    }
}
