//! Async repository trait for game records.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send` for callers on a multi-threaded runtime.

use std::future::Future;

use chess::GameRecord;

use super::StoreError;

/// Keyed store of [`GameRecord`]s.
///
/// `game_id` is the only identity. Implementations must make `upsert` a full,
/// atomic replacement: after it returns, exactly one record exists for the id
/// and none of the previous record's fields survive.
pub trait GameRepository: Send + Sync {
    /// Insert or replace. Records failing [`GameRecord::validate`] are refused.
    fn upsert(&self, record: &GameRecord) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Every stored record, ordered by `game_id`.
    fn list_games(&self) -> impl Future<Output = Result<Vec<GameRecord>, StoreError>> + Send;

    /// Records where `username` is white or black, ordered by `game_id`.
    fn games_for_player(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<GameRecord>, StoreError>> + Send;

    fn load_game(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<Option<GameRecord>, StoreError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
