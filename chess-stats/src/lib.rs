//! Support code for the `chess-stats` binary: game-list loading, text
//! rendering and logging setup.

pub mod display;
pub mod game_list;
pub mod logging;

pub use game_list::{load_game_ids, parse_game_id, read_game_ids, GameListError};
