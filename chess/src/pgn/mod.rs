//! PGN header parsing for manually entered games.

mod parser;

pub use parser::{parse_pgn_tags, PgnHeaders};
