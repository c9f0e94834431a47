use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::category::Tallies;
use crate::types::{ByColor, Color};

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
}

impl GameResult {
    /// Standard PGN notation (`1-0`, `0-1`, `1/2-1/2`).
    pub fn as_notation(self) -> &'static str {
        match self {
            Self::WhiteWin => "1-0",
            Self::BlackWin => "0-1",
            Self::Draw => "1/2-1/2",
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            Self::WhiteWin => Some(Color::White),
            Self::BlackWin => Some(Color::Black),
            Self::Draw => None,
        }
    }
}

impl FromStr for GameResult {
    type Err = RecordError;

    /// Parse a result marker. JSON-escaped slashes (`1\/2-1\/2`) are accepted;
    /// anything outside the three decided results (including `*`) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace("\\/", "/").as_str() {
            "1-0" => Ok(Self::WhiteWin),
            "0-1" => Ok(Self::BlackWin),
            "1/2-1/2" => Ok(Self::Draw),
            other => Err(RecordError::UnknownResult(other.to_string())),
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_notation())
    }
}

/// How a record entered the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordSource {
    /// Scraped from a completed review page.
    AutomatedReview,
    /// Typed in from a PGN code and hand-entered metadata.
    ManualEntry,
}

impl RecordSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AutomatedReview => "AutomatedReview",
            Self::ManualEntry => "ManualEntry",
        }
    }
}

impl FromStr for RecordSource {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AutomatedReview" => Ok(Self::AutomatedReview),
            "ManualEntry" => Ok(Self::ManualEntry),
            other => Err(RecordError::UnknownSource(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("game id must not be empty")]
    EmptyGameId,
    #[error("game {0} has neither a white nor a black username")]
    MissingPlayers(String),
    #[error("game {game_id}: {color} accuracy {value} is outside 0..=100")]
    AccuracyOutOfRange {
        game_id: String,
        color: Color,
        value: f64,
    },
    #[error("game {game_id}: {color} rating must be positive")]
    NonPositiveRating { game_id: String, color: Color },
    #[error("game {0} has no result; pass one explicitly or include a [Result] tag")]
    MissingResult(String),
    #[error("unknown result marker: {0:?}")]
    UnknownResult(String),
    #[error("unknown record source: {0:?}")]
    UnknownSource(String),
}

/// One game's review data.
///
/// `game_id` is the only identity; storing a record with an existing id
/// replaces the earlier record as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub tallies: Tallies,
    /// Accuracy percentage per side; `None` when the review did not measure it.
    pub accuracy: ByColor<Option<f64>>,
    pub result: GameResult,
    /// Review rating per side; `None` when unavailable.
    pub ratings: ByColor<Option<u32>>,
    pub source: RecordSource,
    /// Unix seconds at ingestion.
    pub collected_at: u64,
}

impl GameRecord {
    /// A record with zero tallies and no accuracy or ratings.
    pub fn new(game_id: impl Into<String>, result: GameResult, source: RecordSource) -> Self {
        Self {
            game_id: game_id.into(),
            white_username: None,
            black_username: None,
            tallies: Tallies::default(),
            accuracy: ByColor::default(),
            result,
            ratings: ByColor::default(),
            source,
            collected_at: now_timestamp(),
        }
    }

    /// Set both usernames. Blank names are treated as absent.
    pub fn with_players(mut self, white: Option<&str>, black: Option<&str>) -> Self {
        self.white_username = normalize_username(white);
        self.black_username = normalize_username(black);
        self
    }

    pub fn username(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    /// Occupied seats as `(color, username)`. A seat without a name is skipped.
    pub fn seats(&self) -> impl Iterator<Item = (Color, &str)> + '_ {
        Color::BOTH
            .into_iter()
            .filter_map(move |c| self.username(c).map(|name| (c, name)))
    }

    /// True when the same username fills both seats.
    pub fn is_self_play(&self) -> bool {
        matches!(
            (&self.white_username, &self.black_username),
            (Some(w), Some(b)) if w == b
        )
    }

    /// Check the invariants the store relies on: a non-blank id, at least
    /// one username, accuracy within 0..=100 and positive ratings.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.game_id.trim().is_empty() {
            return Err(RecordError::EmptyGameId);
        }
        if self.seats().next().is_none() {
            return Err(RecordError::MissingPlayers(self.game_id.clone()));
        }
        for color in Color::BOTH {
            if let Some(value) = *self.accuracy.get(color) {
                if !(0.0..=100.0).contains(&value) {
                    return Err(RecordError::AccuracyOutOfRange {
                        game_id: self.game_id.clone(),
                        color,
                        value,
                    });
                }
            }
            if *self.ratings.get(color) == Some(0) {
                return Err(RecordError::NonPositiveRating {
                    game_id: self.game_id.clone(),
                    color,
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn normalize_username(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// Get the current unix timestamp in seconds.
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameRecord {
        GameRecord::new("1001", GameResult::WhiteWin, RecordSource::AutomatedReview)
            .with_players(Some("alice"), Some("bob"))
    }

    #[test]
    fn test_result_from_notation() {
        assert_eq!("1-0".parse::<GameResult>(), Ok(GameResult::WhiteWin));
        assert_eq!("0-1".parse::<GameResult>(), Ok(GameResult::BlackWin));
        assert_eq!("1/2-1/2".parse::<GameResult>(), Ok(GameResult::Draw));
        assert_eq!(" 1\\/2-1\\/2 ".parse::<GameResult>(), Ok(GameResult::Draw));
    }

    #[test]
    fn test_result_rejects_unfinished_and_free_text() {
        assert_eq!(
            "*".parse::<GameResult>(),
            Err(RecordError::UnknownResult("*".to_string()))
        );
        assert!("white won".parse::<GameResult>().is_err());
        assert!("".parse::<GameResult>().is_err());
    }

    #[test]
    fn test_result_notation_roundtrip() {
        for result in [GameResult::WhiteWin, GameResult::BlackWin, GameResult::Draw] {
            assert_eq!(result.as_notation().parse::<GameResult>(), Ok(result));
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_one_player() {
        let record = sample().with_players(None, Some("   "));
        assert_eq!(record.white_username, None);
        assert_eq!(record.black_username, None);
        assert_eq!(
            record.validate(),
            Err(RecordError::MissingPlayers("1001".to_string()))
        );

        let one_sided = sample().with_players(None, Some("bob"));
        assert!(one_sided.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let mut record = sample();
        record.game_id = " ".to_string();
        assert_eq!(record.validate(), Err(RecordError::EmptyGameId));
    }

    #[test]
    fn test_validate_accuracy_range() {
        let mut record = sample();
        record.accuracy = ByColor::new(Some(100.0), Some(0.0));
        assert!(record.validate().is_ok());
        record.accuracy.black = Some(100.5);
        assert!(matches!(
            record.validate(),
            Err(RecordError::AccuracyOutOfRange { color: Color::Black, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_rating() {
        let mut record = sample();
        record.ratings = ByColor::new(Some(0), Some(1500));
        assert_eq!(
            record.validate(),
            Err(RecordError::NonPositiveRating {
                game_id: "1001".to_string(),
                color: Color::White,
            })
        );
        record.ratings.white = Some(1);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_seats_and_self_play() {
        let record = sample();
        let seats: Vec<_> = record.seats().collect();
        assert_eq!(seats, vec![(Color::White, "alice"), (Color::Black, "bob")]);
        assert!(!record.is_self_play());

        let mirrored = sample().with_players(Some("alice"), Some("alice"));
        assert!(mirrored.is_self_play());
    }

    #[test]
    fn test_source_roundtrip() {
        for source in [RecordSource::AutomatedReview, RecordSource::ManualEntry] {
            assert_eq!(source.as_str().parse::<RecordSource>(), Ok(source));
        }
        assert!("Scraped".parse::<RecordSource>().is_err());
    }
}
