//! Runtime configuration for collection runs.
//!
//! Every value has a compile-time default and can be overridden through a
//! dedicated environment variable. Command-line flags override both; that
//! layering happens in the binary, which receives a [`CollectorConfig`] from
//! [`CollectorConfig::from_env`] and patches it.

use std::path::PathBuf;
use std::time::Duration;

use extractor::ExtractorConfig;

/// Default SQLite database file.
const DEFAULT_DB_PATH: &str = "chess_stats.db";

/// Default directory of saved review pages (`<game_id>.html`).
const DEFAULT_PAGES_DIR: &str = "pages";

/// Default pause between games, in seconds.
const DEFAULT_MOVE_DELAY_SECS: f64 = 1.5;

/// Default upper bound on waiting for one review, in seconds.
const DEFAULT_REVIEW_TIMEOUT_SECS: u64 = 25;

/// Default interval between page polls, in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Get the database path.
///
/// Priority:
/// 1. `CHESS_STATS_DB_PATH` env variable if set
/// 2. `chess_stats.db` in the working directory
pub fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("CHESS_STATS_DB_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_DB_PATH)
}

/// Get the directory holding saved review pages.
///
/// Priority:
/// 1. `CHESS_STATS_PAGES_DIR` env variable if set
/// 2. `./pages` as fallback
pub fn get_pages_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHESS_STATS_PAGES_DIR") {
        return PathBuf::from(dir);
    }

    PathBuf::from(DEFAULT_PAGES_DIR)
}

/// Get the delay between games.
///
/// Reads `CHESS_STATS_MOVE_DELAY_SECS` (fractional seconds); negative or
/// unparseable values fall back to the default.
pub fn get_move_delay() -> Duration {
    std::env::var("CHESS_STATS_MOVE_DELAY_SECS")
        .ok()
        .and_then(|v| parse_delay_secs(&v))
        .unwrap_or(Duration::from_secs_f64(DEFAULT_MOVE_DELAY_SECS))
}

/// Get the review completion timeout in seconds (`CHESS_STATS_REVIEW_TIMEOUT_SECS`).
pub fn get_review_timeout_secs() -> u64 {
    if let Ok(timeout) = std::env::var("CHESS_STATS_REVIEW_TIMEOUT_SECS") {
        return timeout.parse().unwrap_or(DEFAULT_REVIEW_TIMEOUT_SECS);
    }

    DEFAULT_REVIEW_TIMEOUT_SECS
}

/// Get the page poll interval in milliseconds (`CHESS_STATS_POLL_INTERVAL_MS`).
///
/// Zero or unparseable values fall back to the default.
pub fn get_poll_interval_ms() -> u64 {
    std::env::var("CHESS_STATS_POLL_INTERVAL_MS")
        .ok()
        .and_then(|v| parse_poll_interval_ms(&v))
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
}

/// Parse a poll interval in milliseconds. Zero is rejected: it would collapse
/// the review timeout into a single check.
pub fn parse_poll_interval_ms(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|ms| *ms > 0)
}

/// Get the directory for daily log files, if file logging is enabled
/// (`CHESS_STATS_LOG_DIR`).
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("CHESS_STATS_LOG_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Parse a non-negative number of (possibly fractional) seconds.
pub fn parse_delay_secs(value: &str) -> Option<Duration> {
    let secs = value.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Timing for a collection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Pause between consecutive games. Not applied after the last one.
    pub move_delay: Duration,
    pub extractor: ExtractorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            move_delay: Duration::from_secs_f64(DEFAULT_MOVE_DELAY_SECS),
            extractor: ExtractorConfig::default(),
        }
    }
}

/// Everything a collection run needs to know, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    pub db_path: PathBuf,
    pub pages_dir: PathBuf,
    pub pipeline: PipelineConfig,
}

impl CollectorConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        Self {
            db_path: get_db_path(),
            pages_dir: get_pages_dir(),
            pipeline: PipelineConfig {
                move_delay: get_move_delay(),
                extractor: ExtractorConfig {
                    timeout: Duration::from_secs(get_review_timeout_secs()),
                    poll_interval: Duration::from_millis(get_poll_interval_ms()),
                },
            },
        }
    }
}
