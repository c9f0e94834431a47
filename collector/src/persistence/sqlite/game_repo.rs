//! SQLite-backed implementation of [`GameRepository`].

use sqlx::SqlitePool;

use chess::{Color, GameRecord};

use super::helpers::{
    decode_game_row, encode_count, encode_result, encode_source, SELECT_SQL, UPSERT_SQL,
};
use crate::persistence::traits::GameRepository;
use crate::persistence::StoreError;

/// SQLite implementation of [`GameRepository`].
#[derive(Clone)]
pub struct SqliteGameRepository {
    pool: SqlitePool,
}

impl SqliteGameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl GameRepository for SqliteGameRepository {
    async fn upsert(&self, record: &GameRecord) -> Result<(), StoreError> {
        record.validate()?;

        let mut tx = self.pool.begin().await?;

        let mut query = sqlx::query(UPSERT_SQL.as_str())
            .bind(&record.game_id)
            .bind(&record.white_username)
            .bind(&record.black_username)
            .bind(record.ratings.white.map(encode_count))
            .bind(record.ratings.black.map(encode_count));
        for (_, counts) in record.tallies.iter() {
            for color in Color::BOTH {
                query = query.bind(encode_count(*counts.get(color)));
            }
        }
        query
            .bind(record.accuracy.white)
            .bind(record.accuracy.black)
            .bind(encode_result(record.result))
            .bind(encode_source(record.source))
            .bind(i64::try_from(record.collected_at).unwrap_or(i64::MAX))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(game_id = %record.game_id, source = record.source.as_str(), "Upserted game");
        Ok(())
    }

    async fn list_games(&self) -> Result<Vec<GameRecord>, StoreError> {
        let rows = sqlx::query(&format!("{} ORDER BY game_id ASC", SELECT_SQL.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_game_row).collect()
    }

    async fn games_for_player(&self, username: &str) -> Result<Vec<GameRecord>, StoreError> {
        let sql = format!(
            "{} WHERE white_username = ? OR black_username = ? ORDER BY game_id ASC",
            SELECT_SQL.as_str()
        );
        let rows = sqlx::query(&sql)
            .bind(username)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_game_row).collect()
    }

    async fn load_game(&self, game_id: &str) -> Result<Option<GameRecord>, StoreError> {
        let sql = format!("{} WHERE game_id = ?", SELECT_SQL.as_str());
        let row = sqlx::query(&sql)
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_game_row).transpose()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM games")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(row.0).unwrap_or_default())
    }
}
