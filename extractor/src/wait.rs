//! Waiting for the remote review computation to finish.

use std::time::Duration;

use crate::error::ExtractionError;
use crate::extract::ExtractorConfig;
use crate::snapshot::ReviewSnapshot;
use crate::traits::{PageSource, Wait};

/// Poll the open page until its review is complete.
///
/// The page is re-read and re-parsed on every poll:
/// 1. Read the current markup and parse a [`ReviewSnapshot`]
/// 2. If the snapshot is complete, return it
/// 3. Otherwise wait `poll_interval` and try again
///
/// At most `timeout / poll_interval` waits happen (a zero interval means a
/// single check), so the loop is bounded regardless of how the [`Wait`]
/// implementation measures time.
///
/// # Errors
///
/// Returns `ExtractionError::Timeout` if the review block never renders and
/// `ExtractionError::Page` if the page cannot be read.
pub async fn wait_for_review<P, W>(
    page: &P,
    wait: &W,
    config: &ExtractorConfig,
    game_id: &str,
) -> Result<ReviewSnapshot, ExtractionError>
where
    P: PageSource,
    W: Wait,
{
    let max_waits = max_waits(config.timeout, config.poll_interval);
    if config.poll_interval.is_zero() && !config.timeout.is_zero() {
        tracing::warn!(game_id, timeout = ?config.timeout, "Zero poll interval, checking the page once");
    }
    let mut waits = 0u32;

    loop {
        let html = page.content().await?;
        // Parse synchronously; the parsed DOM is not Send and must not
        // live across an await point.
        let snapshot = ReviewSnapshot::parse(&html);

        if snapshot.is_complete() {
            tracing::debug!(game_id, polls = waits + 1, "Review complete");
            return Ok(snapshot);
        }

        if waits >= max_waits {
            return Err(ExtractionError::Timeout {
                game_id: game_id.to_string(),
                waited: config.poll_interval * waits,
            });
        }

        tracing::debug!(
            game_id,
            tallies = snapshot.tallies_rendered,
            review_block = snapshot.review_block_rendered,
            "Review not ready yet"
        );
        wait.wait(config.poll_interval).await;
        waits += 1;
    }
}

fn max_waits(timeout: Duration, poll_interval: Duration) -> u32 {
    if poll_interval.is_zero() {
        return 0;
    }
    let n = timeout.as_nanos() / poll_interval.as_nanos();
    u32::try_from(n).unwrap_or(u32::MAX)
}
