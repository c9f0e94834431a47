//! Page sources backed by saved review pages.

use std::path::{Path, PathBuf};

use crate::error::PageError;
use crate::traits::PageSource;

const LIVE_REVIEW_URL: &str = "https://www.chess.com/analysis/game/live/{id}/review";
const PGN_REVIEW_URL: &str = "https://www.chess.com/analysis/game/pgn/{id}/review";

/// Review page URL for a game id.
///
/// Numeric ids are live games; anything else is treated as a PGN code from
/// the analysis board.
pub fn review_url(game_id: &str) -> String {
    let template = if !game_id.is_empty() && game_id.bytes().all(|b| b.is_ascii_digit()) {
        LIVE_REVIEW_URL
    } else {
        PGN_REVIEW_URL
    };
    template.replace("{id}", game_id)
}

/// Reads rendered review pages from `<dir>/<game_id>.html`.
///
/// The file is re-read on every `content()` call, so a browser exporter that
/// rewrites the file while the review computes is observed by the poll loop.
#[derive(Debug, Clone)]
pub struct SnapshotDirSource {
    dir: PathBuf,
    current: Option<PathBuf>,
}

impl SnapshotDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            current: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, game_id: &str) -> Result<PathBuf, PageError> {
        let valid = !game_id.is_empty()
            && game_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PageError::InvalidId(game_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.html", game_id)))
    }
}

impl PageSource for SnapshotDirSource {
    async fn open(&mut self, game_id: &str) -> Result<(), PageError> {
        self.current = None;
        let path = self.file_path(game_id)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(PageError::NotFound {
                game_id: game_id.to_string(),
                path,
            });
        }
        tracing::debug!(game_id, url = %review_url(game_id), path = %path.display(), "Opened review page");
        self.current = Some(path);
        Ok(())
    }

    async fn content(&self) -> Result<String, PageError> {
        let path = self.current.as_ref().ok_or(PageError::NotOpened)?;
        Ok(tokio::fs::read_to_string(path).await?)
    }
}
