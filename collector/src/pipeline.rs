//! Collection runs: open, extract and store each game in turn.

use extractor::{ExtractionError, Extractor, PageSource, Wait};

use chess::GameRecord;

use crate::config::PipelineConfig;
use crate::persistence::{GameRepository, StoreError};

/// A game the run could not ingest. Nothing was written for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGame {
    pub game_id: String,
    /// Short category, e.g. `timeout` or `missing-players`.
    pub kind: &'static str,
    pub reason: String,
}

/// Outcome of [`Pipeline::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub attempted: usize,
    /// Ids stored, in processing order.
    pub saved: Vec<String>,
    pub skipped: Vec<SkippedGame>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("store failure, run aborted: {0}")]
    Store(#[from] StoreError),
}

/// Drives one page source through a list of game ids.
///
/// Games are processed strictly one at a time: the page source is a single
/// browsing session.
pub struct Pipeline<P, R, W> {
    page: P,
    store: R,
    extractor: Extractor<W>,
    config: PipelineConfig,
}

impl<P, R, W> Pipeline<P, R, W>
where
    P: PageSource,
    R: GameRepository,
    W: Wait,
{
    pub fn new(page: P, store: R, wait: W, config: PipelineConfig) -> Self {
        Self {
            page,
            store,
            extractor: Extractor::new(config.extractor, wait),
            config,
        }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Collect every id in order.
    ///
    /// Per-game failures are logged, reported in [`RunReport::skipped`] and
    /// do not stop the run. A store failure stops it immediately; games saved
    /// before that point stay saved, so re-running the same list resumes
    /// safely.
    pub async fn run(&mut self, game_ids: &[String]) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::default();
        tracing::info!(games = game_ids.len(), "Starting collection run");

        for (i, game_id) in game_ids.iter().enumerate() {
            if i > 0 && !self.config.move_delay.is_zero() {
                self.extractor.waiter().wait(self.config.move_delay).await;
            }
            report.attempted += 1;
            tracing::info!(game_id = %game_id, position = i + 1, total = game_ids.len(), "Collecting game");

            match self.collect_one(game_id).await {
                Ok(record) => {
                    self.store.upsert(&record).await?;
                    if record.is_self_play() {
                        tracing::warn!(game_id = %game_id, "Stored game has the same player on both sides");
                    }
                    tracing::info!(
                        game_id = %game_id,
                        white = record.white_username.as_deref().unwrap_or("?"),
                        black = record.black_username.as_deref().unwrap_or("?"),
                        result = %record.result,
                        "Saved game"
                    );
                    report.saved.push(game_id.clone());
                }
                Err(e) => {
                    tracing::warn!(game_id = %game_id, kind = e.kind(), "Skipping game: {}", e);
                    report.skipped.push(SkippedGame {
                        game_id: game_id.clone(),
                        kind: e.kind(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            attempted = report.attempted,
            saved = report.saved.len(),
            skipped = report.skipped.len(),
            "Collection run finished"
        );
        Ok(report)
    }

    async fn collect_one(&mut self, game_id: &str) -> Result<GameRecord, ExtractionError> {
        self.page.open(game_id).await?;
        self.extractor.extract(&self.page, game_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{Database, SqliteGameRepository};
    use chess::{GameResult, MoveCategory};
    use extractor::{ExtractorConfig, InstantWait, MockPageSource};
    use std::time::Duration;

    const LOADING: &str = r#"<html><body><div class="board"></div></body></html>"#;

    fn review(white: &str, black: &str, brilliant: u32, result: &str) -> String {
        format!(
            r#"<html><body>
<div data-cy="analysis-player-Top"><div data-test-element="user-tagline-username">{white}</div></div>
<div data-cy="analysis-player-Bottom"><div data-test-element="user-tagline-username">{black}</div></div>
<div data-cy="game-review-tallies-number-Brilliant-white">{brilliant}</div>
<div data-cy="game-review-tallies-number-Brilliant-black">0</div>
<div data-cy="game-review-tallies-number-BestMove-white">10</div>
<div data-cy="game-review-tallies-number-BestMove-black">8</div>
<div class="game-overview-row"><span class="game-overview-row-title">Accuracy</span>
  <div class="game-overview-row-item"><div class="review-accuracy-white"><span>90.1</span></div></div>
  <div class="game-overview-row-item"><div class="review-accuracy-black"><span>75.0</span></div></div>
</div>
<script>window.chesscom = {{ analysis: {{ pgn: '[Result "{result}"]', }} }};</script>
</body></html>"#
        )
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            move_delay: Duration::from_millis(1500),
            extractor: ExtractorConfig {
                timeout: Duration::from_secs(2),
                poll_interval: Duration::from_millis(500),
            },
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    async fn store() -> SqliteGameRepository {
        let db = Database::new_in_memory().await.unwrap();
        SqliteGameRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn test_run_saves_and_skips() {
        let page = MockPageSource::new()
            .with_page("1", vec![LOADING.to_string(), review("alice", "bob", 2, "1-0")])
            .with_page("2", vec![LOADING])
            .with_missing_page("3")
            .with_page("4", vec![review("carol", "alice", 0, "1/2-1/2")]);
        let wait = InstantWait::new();
        let mut pipeline = Pipeline::new(page, store().await, wait.clone(), config());

        let report = pipeline.run(&ids(&["1", "2", "3", "4"])).await.unwrap();

        assert_eq!(report.attempted, 4);
        assert_eq!(report.saved, vec!["1", "4"]);
        let skipped: Vec<(&str, &str)> = report
            .skipped
            .iter()
            .map(|s| (s.game_id.as_str(), s.kind))
            .collect();
        assert_eq!(skipped, vec![("2", "timeout"), ("3", "page-unavailable")]);
        assert!(!report.is_clean());

        assert_eq!(pipeline.store().count().await.unwrap(), 2);
        let saved = pipeline.store().load_game("1").await.unwrap().unwrap();
        assert_eq!(saved.result, GameResult::WhiteWin);
        assert_eq!(saved.tallies.count(MoveCategory::Brilliant, chess::Color::White), 2);
        assert_eq!(pipeline.page().opened(), ids(&["1", "2", "3", "4"]));
    }

    #[tokio::test]
    async fn test_move_delay_between_games_only() {
        let page = MockPageSource::new()
            .with_page("1", vec![review("alice", "bob", 0, "1-0")])
            .with_page("2", vec![review("bob", "alice", 0, "0-1")])
            .with_page("3", vec![review("alice", "carol", 0, "1-0")]);
        let wait = InstantWait::new();
        let mut pipeline = Pipeline::new(page, store().await, wait.clone(), config());

        pipeline.run(&ids(&["1", "2", "3"])).await.unwrap();

        // Every page was complete on first read, so only move delays remain.
        assert_eq!(wait.waited(), vec![Duration::from_millis(1500); 2]);
    }

    #[tokio::test]
    async fn test_timeout_leaves_store_unchanged() {
        let page = MockPageSource::new()
            .with_page("1", vec![review("alice", "bob", 1, "1-0")])
            .with_page("2", vec![LOADING]);
        let mut pipeline = Pipeline::new(page, store().await, InstantWait::new(), config());
        pipeline.run(&ids(&["1"])).await.unwrap();
        let before = pipeline.store().list_games().await.unwrap();

        let report = pipeline.run(&ids(&["2"])).await.unwrap();

        assert_eq!(report.skipped[0].kind, "timeout");
        assert_eq!(pipeline.store().list_games().await.unwrap(), before);
        // 2s timeout at 500ms polls: one initial read plus four retries.
        assert_eq!(pipeline.page().content_reads("2"), 5);
    }

    #[tokio::test]
    async fn test_unknown_result_and_missing_players_are_skipped() {
        let nameless = review("", "", 0, "1-0");
        let page = MockPageSource::new()
            .with_page("1", vec![review("alice", "bob", 0, "*")])
            .with_page("2", vec![nameless]);
        let mut pipeline = Pipeline::new(page, store().await, InstantWait::new(), config());

        let report = pipeline.run(&ids(&["1", "2"])).await.unwrap();

        let kinds: Vec<&str> = report.skipped.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec!["unknown-result", "missing-players"]);
        assert_eq!(pipeline.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent_and_later_extraction_wins() {
        let page = MockPageSource::new()
            .with_page("1", vec![review("alice", "bob", 1, "1-0")])
            .with_page("2", vec![review("bob", "carol", 0, "0-1")]);
        let mut pipeline = Pipeline::new(page, store().await, InstantWait::new(), config());

        pipeline.run(&ids(&["1", "2"])).await.unwrap();
        let first = pipeline.store().list_games().await.unwrap();
        let report = pipeline.run(&ids(&["1", "2", "1"])).await.unwrap();

        assert_eq!(report.saved, vec!["1", "2", "1"]);
        let second = pipeline.store().list_games().await.unwrap();
        assert_eq!(second.len(), 2);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.game_id, b.game_id);
            assert_eq!(a.tallies, b.tallies);
        }
    }

    #[tokio::test]
    async fn test_store_failure_aborts_run() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = SqliteGameRepository::new(db.pool().clone());
        db.pool().close().await;

        let page = MockPageSource::new()
            .with_page("1", vec![review("alice", "bob", 0, "1-0")])
            .with_page("2", vec![review("bob", "alice", 0, "1-0")]);
        let mut pipeline = Pipeline::new(page, repo, InstantWait::new(), config());

        let err = pipeline.run(&ids(&["1", "2"])).await.unwrap_err();
        assert!(matches!(err, PipelineError::Store(StoreError::Unavailable(_))));
        // The second game was never opened.
        assert_eq!(pipeline.page().opened(), ids(&["1"]));
    }
}
