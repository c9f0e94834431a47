use serde::{Deserialize, Serialize};

use chess::CategoryTotals;

/// Cumulative statistics for one username across every seat it occupied.
///
/// A game where the same name fills both seats counts as two appearances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub username: String,
    /// Seats occupied (white plus black appearances).
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_as_white: u32,
    pub games_as_black: u32,
    /// Category sums over this player's own moves only.
    pub tallies: CategoryTotals,
    /// Mean over seats with a measured accuracy; `None` if there were none.
    pub average_accuracy: Option<f64>,
    /// Mean review rating over seats where one was shown.
    pub average_rating: Option<f64>,
    /// Most brilliant moves in a single game.
    pub max_brilliant: u32,
    pub brilliant_per_game: f64,
    pub great_per_game: f64,
    pub blunder_per_game: f64,
    /// Records where this name is on both sides of the board.
    pub self_play_games: u32,
}

/// Whole-season totals. Each game counts once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub total_games: u32,
    pub unique_players: u32,
    pub white_wins: u32,
    pub black_wins: u32,
    pub draws: u32,
    pub automated_reviews: u32,
    pub manual_entries: u32,
    /// Category totals over both sides of every game.
    pub tallies: CategoryTotals,
    pub total_brilliant: u64,
    /// Mean over every seat with a measured accuracy.
    pub average_accuracy: Option<f64>,
    pub self_play_games: u32,
}
