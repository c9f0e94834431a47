//! Shared encode/decode helpers for SQLite ↔ domain type conversions.
//!
//! These bridge domain enums and the `TEXT` / `INTEGER` columns constrained by
//! the schema's CHECKs, and build the column lists for the `games` table.

use std::sync::LazyLock;

use chess::{ByColor, Color, GameRecord, GameResult, MoveCategory, RecordSource, Tallies};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::persistence::StoreError;

// ── Columns ────────────────────────────────────────────────────────────

/// Column holding one side's count for one category, e.g. `great_black`.
pub fn tally_column(category: MoveCategory, color: Color) -> String {
    format!("{}_{}", category.key(), color.as_str())
}

/// Every `games` column, in bind order.
pub static GAME_COLUMNS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut columns: Vec<String> = [
        "game_id",
        "white_username",
        "black_username",
        "white_rating",
        "black_rating",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();
    for category in MoveCategory::ALL {
        for color in Color::BOTH {
            columns.push(tally_column(category, color));
        }
    }
    columns.extend(
        ["accuracy_white", "accuracy_black", "result", "source", "collected_at"]
            .iter()
            .map(|c| c.to_string()),
    );
    columns
});

pub static UPSERT_SQL: LazyLock<String> = LazyLock::new(|| {
    let placeholders = vec!["?"; GAME_COLUMNS.len()].join(", ");
    format!(
        "INSERT OR REPLACE INTO games ({}) VALUES ({})",
        GAME_COLUMNS.join(", "),
        placeholders
    )
});

pub static SELECT_SQL: LazyLock<String> =
    LazyLock::new(|| format!("SELECT {} FROM games", GAME_COLUMNS.join(", ")));

// ── GameResult ─────────────────────────────────────────────────────────

pub fn encode_result(result: GameResult) -> &'static str {
    result.as_notation()
}

pub fn decode_result(game_id: &str, value: &str) -> Result<GameResult, StoreError> {
    value.parse().map_err(|_| corrupt(game_id, format!("result {value:?}")))
}

// ── RecordSource ───────────────────────────────────────────────────────

pub fn encode_source(source: RecordSource) -> &'static str {
    source.as_str()
}

pub fn decode_source(game_id: &str, value: &str) -> Result<RecordSource, StoreError> {
    value.parse().map_err(|_| corrupt(game_id, format!("source {value:?}")))
}

// ── Integers ───────────────────────────────────────────────────────────

pub fn encode_count(count: u32) -> i64 {
    i64::from(count)
}

pub fn decode_count(game_id: &str, column: &str, value: i64) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| corrupt(game_id, format!("{column} = {value}")))
}

// ── Rows ───────────────────────────────────────────────────────────────

/// Rebuild a [`GameRecord`] from a row selected with [`SELECT_SQL`].
pub fn decode_game_row(row: &SqliteRow) -> Result<GameRecord, StoreError> {
    let game_id: String = row.try_get("game_id")?;

    let mut tallies = Tallies::default();
    for category in MoveCategory::ALL {
        let mut counts = ByColor::new(0, 0);
        for color in Color::BOTH {
            let column = tally_column(category, color);
            let raw: i64 = row.try_get(column.as_str())?;
            *counts.get_mut(color) = decode_count(&game_id, &column, raw)?;
        }
        tallies.set(category, counts);
    }

    let rating = |column: &str| -> Result<Option<u32>, StoreError> {
        let raw: Option<i64> = row.try_get(column)?;
        raw.map(|v| decode_count(&game_id, column, v)).transpose()
    };
    let ratings = ByColor::new(rating("white_rating")?, rating("black_rating")?);

    let result: String = row.try_get("result")?;
    let source: String = row.try_get("source")?;
    let collected_at: i64 = row.try_get("collected_at")?;

    Ok(GameRecord {
        white_username: row.try_get("white_username")?,
        black_username: row.try_get("black_username")?,
        tallies,
        accuracy: ByColor::new(row.try_get("accuracy_white")?, row.try_get("accuracy_black")?),
        result: decode_result(&game_id, &result)?,
        ratings,
        source: decode_source(&game_id, &source)?,
        collected_at: u64::try_from(collected_at).unwrap_or_default(),
        game_id,
    })
}

fn corrupt(game_id: &str, reason: String) -> StoreError {
    StoreError::Corrupt {
        game_id: game_id.to_string(),
        reason,
    }
}
