use std::collections::HashSet;

use chess::{Color, GameRecord, GameResult, MoveCategory, RecordSource};

use crate::mean::Mean;
use crate::types::SeasonSummary;

/// Season totals. Each record counts once however many players it touches.
pub fn summarize_season(records: &[GameRecord]) -> SeasonSummary {
    let mut summary = SeasonSummary::default();
    let mut players: HashSet<&str> = HashSet::new();
    let mut accuracy = Mean::default();

    for record in records {
        summary.total_games += 1;
        match record.result {
            GameResult::WhiteWin => summary.white_wins += 1,
            GameResult::BlackWin => summary.black_wins += 1,
            GameResult::Draw => summary.draws += 1,
        }
        match record.source {
            RecordSource::AutomatedReview => summary.automated_reviews += 1,
            RecordSource::ManualEntry => summary.manual_entries += 1,
        }
        if record.is_self_play() {
            summary.self_play_games += 1;
        }

        for color in Color::BOTH {
            summary.tallies.add_side(&record.tallies, color);
            accuracy.push(*record.accuracy.get(color));
        }
        players.extend(record.seats().map(|(_, name)| name));
    }

    summary.unique_players = players.len() as u32;
    summary.total_brilliant = summary.tallies.get(MoveCategory::Brilliant);
    summary.average_accuracy = accuracy.value();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{ByColor, ManualEntry, Tallies};

    fn game(id: &str, white: &str, black: &str, brilliant: (u32, u32)) -> GameRecord {
        let mut record = GameRecord::new(id, GameResult::WhiteWin, RecordSource::AutomatedReview)
            .with_players(Some(white), Some(black));
        record.tallies = Tallies::default().with(MoveCategory::Brilliant, brilliant.0, brilliant.1);
        record
    }

    #[test]
    fn test_empty_season() {
        let summary = summarize_season(&[]);
        assert_eq!(summary, SeasonSummary::default());
        assert_eq!(summary.average_accuracy, None);
    }

    #[test]
    fn test_games_are_counted_once() {
        let records = vec![
            game("g1", "alice", "bob", (2, 0)),
            game("g2", "bob", "carol", (1, 1)),
            game("g3", "carol", "alice", (0, 3)),
        ];
        let summary = summarize_season(&records);
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.unique_players, 3);
        assert_eq!(summary.white_wins, 3);
        assert_eq!(summary.total_brilliant, 7);
        assert_eq!(summary.tallies.get(MoveCategory::Brilliant), 7);
    }

    #[test]
    fn test_manual_draw_counted_once() {
        let manual = ManualEntry::new("jFY6SgYtW", "alice", "bob")
            .with_result(GameResult::Draw)
            .into_record()
            .unwrap();
        let records = vec![game("g1", "alice", "bob", (0, 0)), manual];
        let summary = summarize_season(&records);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.manual_entries, 1);
        assert_eq!(summary.automated_reviews, 1);
    }

    #[test]
    fn test_average_accuracy_over_measured_seats() {
        let mut first = game("g1", "alice", "bob", (0, 0));
        first.accuracy = ByColor::new(Some(90.0), None);
        let mut second = game("g2", "carol", "dave", (0, 0));
        second.accuracy = ByColor::new(Some(70.0), Some(80.0));
        let summary = summarize_season(&[first, second]);
        assert_eq!(summary.average_accuracy, Some(80.0));
    }

    #[test]
    fn test_self_play_flagged() {
        let summary = summarize_season(&[game("g1", "erin", "erin", (1, 1))]);
        assert_eq!(summary.self_play_games, 1);
        assert_eq!(summary.unique_players, 1);
        assert_eq!(summary.total_brilliant, 2);
    }
}
