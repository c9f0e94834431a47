//! Collection runs and season statistics on top of a SQLite game store.
//!
//! - [`persistence`]: the [`GameRepository`] seam and its SQLite backend
//! - [`pipeline`]: open, extract and store each game id in turn
//! - [`service`]: per-player and season summaries over stored games
//! - [`config`]: defaults and environment overrides

pub mod config;
pub mod persistence;
pub mod pipeline;
pub mod service;

pub use config::{CollectorConfig, PipelineConfig};
pub use persistence::{Database, GameRepository, SqliteGameRepository, StoreError};
pub use pipeline::{Pipeline, PipelineError, RunReport, SkippedGame};
pub use service::StatsService;
