use chess::{ByColor, GameRecord, GameResult, ManualEntry, MoveCategory, RecordSource, Tallies};

use super::{Database, SqliteGameRepository};
use crate::persistence::traits::GameRepository;
use crate::persistence::StoreError;

fn sample_game(id: &str, white: &str, black: &str) -> GameRecord {
    let mut record = GameRecord::new(id, GameResult::WhiteWin, RecordSource::AutomatedReview)
        .with_players(Some(white), Some(black));
    record.tallies = Tallies::default()
        .with(MoveCategory::Brilliant, 2, 0)
        .with(MoveCategory::Best, 10, 8)
        .with(MoveCategory::Blunder, 0, 3);
    record.accuracy = ByColor::new(Some(90.1), Some(75.0));
    record.ratings = ByColor::new(Some(1650), None);
    record.collected_at = 1_760_000_000;
    record
}

async fn repo() -> SqliteGameRepository {
    let db = Database::new_in_memory().await.unwrap();
    SqliteGameRepository::new(db.pool().clone())
}

#[tokio::test]
async fn test_upsert_and_load_round_trip() {
    let repo = repo().await;
    let record = sample_game("165168859868", "alice", "bob");
    repo.upsert(&record).await.unwrap();

    let loaded = repo.load_game("165168859868").await.unwrap().unwrap();
    assert_eq!(loaded, record);
    assert!(repo.load_game("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let repo = repo().await;
    let record = sample_game("g1", "alice", "bob");
    repo.upsert(&record).await.unwrap();
    repo.upsert(&record).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(repo.list_games().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn test_upsert_replaces_whole_record() {
    let repo = repo().await;
    repo.upsert(&sample_game("g1", "alice", "bob")).await.unwrap();

    // Fewer fields known the second time: nothing from the first row survives.
    let mut replacement = GameRecord::new("g1", GameResult::Draw, RecordSource::ManualEntry)
        .with_players(Some("alice"), None);
    replacement.tallies = Tallies::default().with(MoveCategory::Good, 4, 0);
    replacement.collected_at = 1_760_000_500;
    repo.upsert(&replacement).await.unwrap();

    let loaded = repo.load_game("g1").await.unwrap().unwrap();
    assert_eq!(loaded, replacement);
    assert_eq!(loaded.tallies.get(MoveCategory::Brilliant), ByColor::new(0, 0));
    assert_eq!(loaded.accuracy, ByColor::new(None, None));
    assert_eq!(loaded.black_username, None);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_games_ordered_by_id() {
    let repo = repo().await;
    for id in ["g3", "g1", "g2"] {
        repo.upsert(&sample_game(id, "alice", "bob")).await.unwrap();
    }
    let ids: Vec<String> = repo
        .list_games()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.game_id)
        .collect();
    assert_eq!(ids, vec!["g1", "g2", "g3"]);
}

#[tokio::test]
async fn test_games_for_player_matches_either_seat() {
    let repo = repo().await;
    repo.upsert(&sample_game("g1", "alice", "bob")).await.unwrap();
    repo.upsert(&sample_game("g2", "carol", "alice")).await.unwrap();
    repo.upsert(&sample_game("g3", "bob", "carol")).await.unwrap();

    let alice: Vec<String> = repo
        .games_for_player("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.game_id)
        .collect();
    assert_eq!(alice, vec!["g1", "g2"]);
    assert!(repo.games_for_player("dave").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_manual_entry_stored_alongside_reviews() {
    let repo = repo().await;
    let manual = ManualEntry::new("jFY6SgYtW", "alice", "bob")
        .with_result(GameResult::Draw)
        .into_record()
        .unwrap();
    repo.upsert(&manual).await.unwrap();
    repo.upsert(&sample_game("g1", "alice", "bob")).await.unwrap();

    let loaded = repo.load_game("jFY6SgYtW").await.unwrap().unwrap();
    assert_eq!(loaded.source, RecordSource::ManualEntry);
    assert_eq!(loaded.result, GameResult::Draw);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_invalid_record_is_refused() {
    let repo = repo().await;
    let nameless = GameRecord::new("g1", GameResult::Draw, RecordSource::ManualEntry);
    let err = repo.upsert(&nameless).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidRecord(_)));

    let mut out_of_range = sample_game("g2", "alice", "bob");
    out_of_range.accuracy.white = Some(101.0);
    assert!(matches!(
        repo.upsert(&out_of_range).await,
        Err(StoreError::InvalidRecord(_))
    ));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_zero_rating_is_an_invalid_record() {
    let repo = repo().await;
    let mut unrated = sample_game("g1", "alice", "bob");
    unrated.ratings = ByColor::new(Some(0), Some(1500));

    let err = repo.upsert(&unrated).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidRecord(chess::RecordError::NonPositiveRating {
            color: chess::Color::White,
            ..
        })
    ));

    // The pool is still usable afterwards.
    repo.upsert(&sample_game("g2", "alice", "bob")).await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_corrupt_row_is_reported() {
    let db = Database::new_in_memory().await.unwrap();
    let repo = SqliteGameRepository::new(db.pool().clone());
    repo.upsert(&sample_game("g1", "alice", "bob")).await.unwrap();

    // Passes the schema's `> 0` check but does not fit a u32.
    sqlx::query("UPDATE games SET white_rating = 5000000000 WHERE game_id = 'g1'")
        .execute(db.pool())
        .await
        .unwrap();
    let err = repo.load_game("g1").await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { ref game_id, .. } if game_id == "g1"));
}

#[tokio::test]
async fn test_schema_rejects_unknown_result() {
    let db = Database::new_in_memory().await.unwrap();
    let err = sqlx::query(
        "INSERT INTO games (game_id, white_username, result, source, collected_at)
         VALUES ('g1', 'alice', '*', 'ManualEntry', 0)",
    )
    .execute(db.pool())
    .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.db");
    let record = sample_game("g1", "alice", "bob");

    {
        let db = Database::open(&path).await.unwrap();
        let repo = SqliteGameRepository::new(db.pool().clone());
        repo.upsert(&record).await.unwrap();
        db.pool().close().await;
    }

    let db = Database::open_existing(&path).await.unwrap();
    let repo = SqliteGameRepository::new(db.pool().clone());
    assert_eq!(repo.list_games().await.unwrap(), vec![record]);
}
