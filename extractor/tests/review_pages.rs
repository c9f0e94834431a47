use std::path::PathBuf;
use std::time::Duration;

use chess::{ByColor, GameResult, ManualEntry, MoveCategory, RecordSource};
use extractor::{
    extract_from_html, extract_manual_html, Extractor, ExtractorConfig, PageSource,
    SnapshotDirSource, TokioWait,
};

const WIN_LOSS: &str = include_str!("fixtures/win_loss.html");
const CUSTOM_BOARD: &str = include_str!("fixtures/custom_board.html");
const DRAW_USER_DETAILS: &str = include_str!("fixtures/draw_user_details.html");

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn test_live_game_review() {
    let record = extract_from_html(WIN_LOSS, "165168859868", 1_760_000_000).unwrap();

    assert_eq!(record.white_username.as_deref(), Some("rook_lift"));
    assert_eq!(record.black_username.as_deref(), Some("knightcrawler"));
    assert_eq!(record.result, GameResult::BlackWin);
    assert_eq!(record.accuracy, ByColor::new(Some(76.6), Some(81.5)));
    assert_eq!(record.ratings, ByColor::new(Some(1300), Some(1450)));

    let t = &record.tallies;
    assert_eq!(t.get(MoveCategory::Brilliant), ByColor::new(0, 1));
    assert_eq!(t.get(MoveCategory::Great), ByColor::new(1, 0));
    assert_eq!(t.get(MoveCategory::Best), ByColor::new(4, 10));
    assert_eq!(t.get(MoveCategory::Blunder), ByColor::new(1, 0));
    assert_eq!(t.side_total(chess::Color::White), 34);
    assert_eq!(t.side_total(chess::Color::Black), 35);
}

#[test]
fn test_user_details_and_escaped_draw() {
    let record = extract_from_html(DRAW_USER_DETAILS, "170000000001", 0).unwrap();

    assert_eq!(record.white_username.as_deref(), Some("endgame_ella"));
    assert_eq!(record.black_username.as_deref(), Some("pawnstorm"));
    assert_eq!(record.result, GameResult::Draw);
    assert_eq!(record.accuracy, ByColor::new(Some(91.3), Some(89.0)));
    assert_eq!(record.ratings, ByColor::new(Some(1620), Some(1585)));
    assert_eq!(record.tallies.get(MoveCategory::Best), ByColor::new(17, 15));
    assert_eq!(record.tallies.get(MoveCategory::Mistake), ByColor::new(0, 0));
}

#[test]
fn test_custom_board_needs_manual_entry() {
    // The board's "*" result cannot be stored as an automated review.
    let err = extract_from_html(CUSTOM_BOARD, "jFY6SgYtW", 0).unwrap_err();
    assert_eq!(err.kind(), "unknown-result");

    let entry = ManualEntry::new("jFY6SgYtW", "gina", "hal").with_result(GameResult::BlackWin);
    let record = extract_manual_html(CUSTOM_BOARD, entry, 0).unwrap();
    assert_eq!(record.white_username.as_deref(), Some("gina"));
    assert_eq!(record.black_username.as_deref(), Some("hal"));
    assert_eq!(record.result, GameResult::BlackWin);
    assert_eq!(record.source, RecordSource::ManualEntry);
    assert_eq!(record.accuracy, ByColor::new(Some(73.9), Some(87.7)));
    assert_eq!(record.ratings, ByColor::new(Some(1750), Some(2350)));
    assert_eq!(record.tallies.get(MoveCategory::Great), ByColor::new(1, 4));
}

#[tokio::test]
async fn test_extract_from_snapshot_dir() {
    let mut pages = SnapshotDirSource::new(fixtures_dir());
    pages.open("win_loss").await.unwrap();

    let config = ExtractorConfig {
        timeout: Duration::from_millis(200),
        poll_interval: Duration::from_millis(50),
    };
    let extractor = Extractor::new(config, TokioWait);
    let record = extractor.extract(&pages, "win_loss").await.unwrap();

    assert_eq!(record.game_id, "win_loss");
    assert_eq!(record.source, RecordSource::AutomatedReview);
    assert!(record.collected_at > 0);
}
