//! Game-id lists exported as CSV.
//!
//! The first row is a header. Ids come from the `game_id` column when there
//! is one, otherwise from the first column. A cell may hold a bare numeric id
//! or a game / review URL.

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static LIVE_GAME_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:analysis/game/live|game/live)/(\d+)")
        .unwrap_or_else(|e| unreachable!("live game url pattern: {e}"))
});

const ID_COLUMN: &str = "game_id";

#[derive(Debug, thiserror::Error)]
pub enum GameListError {
    #[error("cannot read game list: {0}")]
    Csv(#[from] csv::Error),
}

/// Extract a game id from one cell. `None` for blanks and unrecognized text.
pub fn parse_game_id(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if cell.bytes().all(|b| b.is_ascii_digit()) {
        return Some(cell.to_string());
    }
    LIVE_GAME_URL
        .captures(cell)
        .map(|caps| caps[1].to_string())
}

/// Read ids in file order. Duplicates are kept; unusable cells are skipped
/// with a warning.
pub fn read_game_ids<R: io::Read>(reader: R) -> Result<Vec<String>, GameListError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let column = csv
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case(ID_COLUMN))
        .unwrap_or(0);

    let mut ids = Vec::new();
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        let cell = record.get(column).unwrap_or_default();
        match parse_game_id(cell) {
            Some(id) => ids.push(id),
            None => {
                // +2: one for the header, one for 1-based numbering.
                tracing::warn!(line = row + 2, cell, "No game id in CSV row, skipping");
            }
        }
    }
    Ok(ids)
}

pub fn load_game_ids(path: &Path) -> Result<Vec<String>, GameListError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let ids = read_game_ids(file)?;
    tracing::info!(path = %path.display(), games = ids.len(), "Loaded game list");
    Ok(ids)
}
