//! Game record model for club review statistics.
//!
//! A [`GameRecord`] is the canonical, validated form of one game's review
//! data, whether it was scraped from a review page or typed in by hand.

pub mod category;
pub mod manual;
pub mod pgn;
pub mod record;
pub mod types;

pub use category::{CategoryTotals, MoveCategory, Tallies};
pub use manual::ManualEntry;
pub use pgn::{parse_pgn_tags, PgnHeaders};
pub use record::{now_timestamp, GameRecord, GameResult, RecordError, RecordSource};
pub use types::{ByColor, Color};
