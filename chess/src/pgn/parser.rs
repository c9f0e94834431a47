use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::record::{GameResult, RecordError};

static TAG_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[\s*([A-Za-z0-9_]+)\s+"((?:[^"\\]|\\.)*)"\s*\]"#)
        .unwrap_or_else(|e| unreachable!("tag pattern is valid: {e}"))
});

/// Tag section of a PGN game.
///
/// Only the header is read; movetext is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PgnHeaders {
    pub tags: HashMap<String, String>,
}

impl PgnHeaders {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    /// The `[Result]` tag, if present.
    ///
    /// `Some(Err(_))` means the tag exists but is not a decided result
    /// (for example `*` for an unfinished game).
    pub fn result(&self) -> Option<Result<GameResult, RecordError>> {
        self.tag("Result").map(str::parse)
    }

    /// `[WhiteElo]`, unless absent, unparseable, or `0` (unrated).
    pub fn white_elo(&self) -> Option<u32> {
        self.elo("WhiteElo")
    }

    pub fn black_elo(&self) -> Option<u32> {
        self.elo("BlackElo")
    }

    fn elo(&self, name: &str) -> Option<u32> {
        self.tag(name)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|elo| *elo > 0)
    }
}

/// Collect every `[Name "value"]` pair in `input`. Later duplicates win.
pub fn parse_pgn_tags(input: &str) -> PgnHeaders {
    let tags = TAG_PAIR
        .captures_iter(input)
        .map(|caps| {
            let value = caps[2].replace("\\\"", "\"").replace("\\\\", "\\");
            (caps[1].to_string(), value)
        })
        .collect();
    PgnHeaders { tags }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAGUE_GAME: &str = "[Event \"League\"]\n[White \"Alice\"]\n[Black \"Bob\"]\n[Result \"1-0\"]\n[WhiteElo \"1200\"]\n[BlackElo \"1150\"]\n\n1. e4 e5 1-0";

    #[test]
    fn test_parse_tags() {
        let headers = parse_pgn_tags(LEAGUE_GAME);
        assert_eq!(headers.tag("Event"), Some("League"));
        assert_eq!(headers.tag("White"), Some("Alice"));
        assert_eq!(headers.result(), Some(Ok(GameResult::WhiteWin)));
        assert_eq!(headers.white_elo(), Some(1200));
        assert_eq!(headers.black_elo(), Some(1150));
    }

    #[test]
    fn test_draw_result() {
        let headers = parse_pgn_tags("[Result \"1/2-1/2\"]\n\n1. e4 e5 1/2-1/2");
        assert_eq!(headers.result(), Some(Ok(GameResult::Draw)));
        assert_eq!(headers.white_elo(), None);
    }

    #[test]
    fn test_unfinished_result_is_an_error() {
        let headers = parse_pgn_tags("[Result \"*\"]");
        assert!(matches!(headers.result(), Some(Err(RecordError::UnknownResult(_)))));
    }

    #[test]
    fn test_missing_tags() {
        let headers = parse_pgn_tags("1. e4 e5 2. Nf3");
        assert!(headers.tags.is_empty());
        assert_eq!(headers.result(), None);
    }

    #[test]
    fn test_escaped_quotes_in_value() {
        let headers = parse_pgn_tags(r#"[Annotator "the \"coach\""]"#);
        assert_eq!(headers.tag("Annotator"), Some("the \"coach\""));
    }

    #[test]
    fn test_non_numeric_elo_is_ignored() {
        let headers = parse_pgn_tags("[WhiteElo \"?\"]\n[BlackElo \"-\"]");
        assert_eq!(headers.white_elo(), None);
        assert_eq!(headers.black_elo(), None);

        let unrated = parse_pgn_tags("[WhiteElo \"0\"]");
        assert_eq!(unrated.white_elo(), None);
    }
}
