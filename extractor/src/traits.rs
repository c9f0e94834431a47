//! Seams to the outside world: where page content comes from, and how time
//! passes between polls.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! callers can rely on the futures being `Send`.

use std::future::Future;
use std::time::Duration;

use crate::error::PageError;

/// A loaded review page whose rendered markup can be re-read while the
/// remote review is still computing.
///
/// One page is open at a time; `open` replaces the previous one.
pub trait PageSource: Send + Sync {
    /// Navigate to the review page for `game_id`.
    fn open(&mut self, game_id: &str) -> impl Future<Output = Result<(), PageError>> + Send;

    /// Current rendered markup of the open page.
    fn content(&self) -> impl Future<Output = Result<String, PageError>> + Send;
}

/// Suspension primitive used between polls and between games.
pub trait Wait: Send + Sync {
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Real-time waiting on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioWait;

impl Wait for TokioWait {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
