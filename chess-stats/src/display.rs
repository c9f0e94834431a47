//! Plain-text rendering of summaries and run reports.

use std::fmt;

use analysis::{PlayerSummary, SeasonSummary};
use chess::{CategoryTotals, GameRecord, MoveCategory};
use collector::RunReport;

/// Ranked player summaries, one block per player.
pub struct PlayerTable<'a>(pub &'a [PlayerSummary]);

/// Season overview.
pub struct SeasonOverview<'a>(pub &'a SeasonSummary);

/// End-of-run line plus the list of skipped games.
pub struct RunOutcome<'a>(pub &'a RunReport);

/// One-line confirmation for a stored game.
pub struct SavedGame<'a>(pub &'a GameRecord);

fn or_unknown(value: Option<f64>, precision: usize, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v:.precision$}{suffix}"),
        None => "n/a".to_string(),
    }
}

fn per_game(total: u64, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        total as f64 / f64::from(games)
    }
}

fn write_categories(f: &mut fmt::Formatter<'_>, indent: &str, tallies: &CategoryTotals) -> fmt::Result {
    let line = |categories: &[MoveCategory]| {
        categories
            .iter()
            .map(|c| format!("{c}: {}", tallies.get(*c)))
            .collect::<Vec<_>>()
            .join("  ")
    };
    writeln!(
        f,
        "{indent}{}",
        line(&[
            MoveCategory::Brilliant,
            MoveCategory::Great,
            MoveCategory::Book,
            MoveCategory::Best,
        ])
    )?;
    writeln!(f, "{indent}{}", line(&[MoveCategory::Excellent, MoveCategory::Good]))?;
    writeln!(
        f,
        "{indent}{}",
        line(&[
            MoveCategory::Inaccuracy,
            MoveCategory::Mistake,
            MoveCategory::Miss,
            MoveCategory::Blunder,
        ])
    )
}

impl fmt::Display for PlayerTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No player data yet. Run 'collect' first.");
        }
        writeln!(f, "=== Player Summaries ===")?;
        for p in self.0 {
            writeln!(f)?;
            writeln!(f, "  {}", p.username)?;
            writeln!(
                f,
                "    Games: {} ({}W / {}L / {}D)  |  White {} / Black {}  |  Avg rating: {}  |  Avg accuracy: {}",
                p.games_played,
                p.wins,
                p.losses,
                p.draws,
                p.games_as_white,
                p.games_as_black,
                or_unknown(p.average_rating, 0, ""),
                or_unknown(p.average_accuracy, 1, "%"),
            )?;
            writeln!(
                f,
                "    Brilliant per game: {:.2}  (best single game: {})  |  Great per game: {:.2}  |  Blunders per game: {:.2}",
                p.brilliant_per_game, p.max_brilliant, p.great_per_game, p.blunder_per_game,
            )?;
            write_categories(f, "    ", &p.tallies)?;
            if p.self_play_games > 0 {
                writeln!(f, "    Self-play games: {}", p.self_play_games)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SeasonOverview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "=== Season Overview ===")?;
        writeln!(f)?;
        writeln!(
            f,
            "  Total games: {} ({} reviewed, {} manual)",
            s.total_games, s.automated_reviews, s.manual_entries
        )?;
        writeln!(f, "  Unique players: {}", s.unique_players)?;
        writeln!(
            f,
            "  Results: {} white wins, {} black wins, {} draws",
            s.white_wins, s.black_wins, s.draws
        )?;
        writeln!(
            f,
            "  Total Brilliant moves: {} ({:.2} per game)",
            s.total_brilliant,
            per_game(s.total_brilliant, s.total_games)
        )?;
        writeln!(f, "  Average accuracy: {}", or_unknown(s.average_accuracy, 1, "%"))?;
        if s.self_play_games > 0 {
            writeln!(f, "  Self-play games: {}", s.self_play_games)?;
        }
        writeln!(f, "  Move categories:")?;
        write_categories(f, "    ", &s.tallies)
    }
}

impl fmt::Display for RunOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(
            f,
            "Done: {} attempted, {} saved, {} skipped.",
            r.attempted,
            r.saved.len(),
            r.skipped.len()
        )?;
        if !r.skipped.is_empty() {
            writeln!(f, "Skipped games:")?;
            for s in &r.skipped {
                writeln!(f, "  {}  [{}]  {}", s.game_id, s.kind, s.reason)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SavedGame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.0;
        write!(
            f,
            "Saved {}: {} vs {} ({})",
            g.game_id,
            g.white_username.as_deref().unwrap_or("?"),
            g.black_username.as_deref().unwrap_or("?"),
            g.result
        )?;
        if let (Some(w), Some(b)) = (g.accuracy.white, g.accuracy.black) {
            write!(f, "  accuracy {w:.1}% / {b:.1}%")?;
        }
        Ok(())
    }
}
