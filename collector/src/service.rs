//! Read-only statistics over the store.

use analysis::{rank_players, summarize_by_player, summarize_season, PlayerSummary, SeasonSummary};

use crate::persistence::{GameRepository, StoreError};

/// Query surface for per-player and season statistics.
///
/// Summaries are recomputed from the stored records on every call.
pub struct StatsService<R> {
    store: R,
}

impl<R: GameRepository> StatsService<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    /// Every player, most brilliant moves first.
    pub async fn players(&self) -> Result<Vec<PlayerSummary>, StoreError> {
        let games = self.store.list_games().await?;
        Ok(rank_players(summarize_by_player(&games).into_values()))
    }

    pub async fn summary(&self) -> Result<SeasonSummary, StoreError> {
        let games = self.store.list_games().await?;
        Ok(summarize_season(&games))
    }

    /// Statistics for one player, or `None` if they have no stored games.
    pub async fn player(&self, username: &str) -> Result<Option<PlayerSummary>, StoreError> {
        let games = self.store.games_for_player(username).await?;
        Ok(summarize_by_player(&games).remove(username))
    }
}
