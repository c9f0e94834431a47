use std::cmp::Ordering;
use std::collections::HashMap;

use chess::{CategoryTotals, Color, GameRecord, MoveCategory};

use crate::mean::Mean;
use crate::types::PlayerSummary;

#[derive(Debug, Default)]
struct Accumulator {
    games_played: u32,
    wins: u32,
    losses: u32,
    draws: u32,
    games_as_white: u32,
    games_as_black: u32,
    tallies: CategoryTotals,
    accuracy: Mean,
    rating: Mean,
    max_brilliant: u32,
    self_play_games: u32,
}

impl Accumulator {
    fn add_seat(&mut self, record: &GameRecord, color: Color) {
        self.games_played += 1;
        match color {
            Color::White => self.games_as_white += 1,
            Color::Black => self.games_as_black += 1,
        }
        match record.result.winner() {
            None => self.draws += 1,
            Some(winner) if winner == color => self.wins += 1,
            Some(_) => self.losses += 1,
        }

        self.tallies.add_side(&record.tallies, color);
        self.max_brilliant = self
            .max_brilliant
            .max(record.tallies.count(MoveCategory::Brilliant, color));
        self.accuracy.push(*record.accuracy.get(color));
        self.rating.push(record.ratings.get(color).map(f64::from));
    }

    fn finish(self, username: String) -> PlayerSummary {
        let per_game = |category: MoveCategory| {
            if self.games_played == 0 {
                0.0
            } else {
                self.tallies.get(category) as f64 / f64::from(self.games_played)
            }
        };
        PlayerSummary {
            brilliant_per_game: per_game(MoveCategory::Brilliant),
            great_per_game: per_game(MoveCategory::Great),
            blunder_per_game: per_game(MoveCategory::Blunder),
            username,
            games_played: self.games_played,
            wins: self.wins,
            losses: self.losses,
            draws: self.draws,
            games_as_white: self.games_as_white,
            games_as_black: self.games_as_black,
            tallies: self.tallies,
            average_accuracy: self.accuracy.value(),
            average_rating: self.rating.value(),
            max_brilliant: self.max_brilliant,
            self_play_games: self.self_play_games,
        }
    }
}

/// Group records by every username seen in either seat.
///
/// Each occupied seat contributes its own result, tallies, accuracy and
/// rating; the opponent's side of the record is never credited. Unset
/// accuracies and ratings are left out of both sum and count.
pub fn summarize_by_player(records: &[GameRecord]) -> HashMap<String, PlayerSummary> {
    let mut players: HashMap<String, Accumulator> = HashMap::new();

    for record in records {
        if record.is_self_play() {
            tracing::warn!(
                game_id = %record.game_id,
                username = record.white_username.as_deref().unwrap_or_default(),
                "Same player on both sides; counting both seats"
            );
            if let Some(name) = &record.white_username {
                players.entry(name.clone()).or_default().self_play_games += 1;
            }
        }
        for (color, username) in record.seats() {
            players
                .entry(username.to_string())
                .or_default()
                .add_seat(record, color);
        }
    }

    players
        .into_iter()
        .map(|(name, acc)| {
            let summary = acc.finish(name.clone());
            (name, summary)
        })
        .collect()
}

/// Display order: most brilliant moves first, then most games, then name.
pub fn rank_players(summaries: impl IntoIterator<Item = PlayerSummary>) -> Vec<PlayerSummary> {
    let mut ranked: Vec<PlayerSummary> = summaries.into_iter().collect();
    ranked.sort_by(compare_rank);
    ranked
}

fn compare_rank(a: &PlayerSummary, b: &PlayerSummary) -> Ordering {
    let brilliant = |p: &PlayerSummary| p.tallies.get(MoveCategory::Brilliant);
    brilliant(b)
        .cmp(&brilliant(a))
        .then_with(|| b.games_played.cmp(&a.games_played))
        .then_with(|| a.username.cmp(&b.username))
}
