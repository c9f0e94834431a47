//! Per-player and season statistics over stored game records.
//!
//! Everything here is a pure function of a slice of [`chess::GameRecord`]s;
//! summaries are recomputed on demand and never persisted.

mod mean;
pub mod player;
pub mod season;
pub mod types;

pub use player::{rank_players, summarize_by_player};
pub use season::summarize_season;
pub use types::*;
