//! Field-by-field reading of review-page markup.
//!
//! The page is third-party markup whose layout varies between live games,
//! PGN imports and custom boards, so most fields have an ordered list of
//! places to look. Nothing here decides what a missing field means; that
//! policy lives in [`crate::extract`].

use regex::Regex;
use scraper::{CaseSensitivity, ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

use chess::{parse_pgn_tags, ByColor, Color, GameResult, MoveCategory};

use crate::field::Field;

static PGN_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)pgn:\s*'(.+?)',").unwrap_or_else(|e| unreachable!("pgn pattern: {e}"))
});

static USER_DETAILS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)userDetails:\s*JSON\.parse\s*\(\s*"(.+?)"\s*\)"#)
        .unwrap_or_else(|e| unreachable!("userDetails pattern: {e}"))
});

/// Everything readable from one rendering of a review page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSnapshot {
    pub usernames: ByColor<Option<String>>,
    /// One entry per category, in [`MoveCategory::ALL`] order.
    pub tallies: Vec<(MoveCategory, ByColor<Field<u32>>)>,
    pub accuracy: ByColor<Field<f64>>,
    pub ratings: ByColor<Field<u32>>,
    pub result: Field<GameResult>,
    /// At least one tally node is on the page.
    pub tallies_rendered: bool,
    /// The accuracy / game-rating block shows at least one value. It renders
    /// last.
    pub review_block_rendered: bool,
}

impl ReviewSnapshot {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let details = user_details(html);

        let usernames = ByColor::new(
            detail_username(details.as_ref(), Color::White)
                .or_else(|| card_username(root, "Top")),
            detail_username(details.as_ref(), Color::Black)
                .or_else(|| card_username(root, "Bottom")),
        );

        let tallies: Vec<_> = MoveCategory::ALL
            .iter()
            .map(|&category| {
                let read = |color: Color| {
                    let css = format!(
                        "[data-cy='game-review-tallies-number-{}-{}']",
                        category.page_label(),
                        color.as_str()
                    );
                    Field::parse_text(first_text(root, &css), |s| s.parse::<u32>().ok())
                };
                (category, ByColor::new(read(Color::White), read(Color::Black)))
            })
            .collect();
        let tallies_rendered = tallies
            .iter()
            .any(|(_, pair)| !pair.white.is_missing() || !pair.black.is_missing());

        let accuracy = read_accuracy(root);
        let mut ratings = read_ratings(root);
        // The rows are drawn before their values; only a reading counts.
        let review_block_rendered = Color::BOTH.into_iter().any(|color| {
            accuracy.get(color).has_reading() || ratings.get(color).has_reading()
        });
        for color in Color::BOTH {
            fallback(ratings.get_mut(color), || {
                detail_game_rating(details.as_ref(), color)
            });
        }

        Self {
            usernames,
            tallies,
            accuracy,
            ratings,
            result: embedded_result(html),
            tallies_rendered,
            review_block_rendered,
        }
    }

    /// The review has finished computing: tallies and the closing
    /// accuracy / rating block are both present.
    pub fn is_complete(&self) -> bool {
        self.tallies_rendered && self.review_block_rendered
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!("built-in selector {css:?} is valid"))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    scope.select(&selector(css)).next().map(element_text)
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value()
        .has_class(class, CaseSensitivity::CaseSensitive)
}

/// Replace a field with the fallback's reading when it has no value yet.
fn fallback<T>(slot: &mut Field<T>, next: impl FnOnce() -> Field<T>) {
    let current = std::mem::replace(slot, Field::Missing);
    *slot = current.or_else(next);
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_accuracy(s: &str) -> Option<f64> {
    let value: f64 = s.trim_end_matches('%').trim().parse().ok()?;
    (value.is_finite() && (0.0..=100.0).contains(&value)).then_some(value)
}

fn parse_rating(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|v| *v > 0)
}

// ── embedded userDetails JSON ──────────────────────────────────────────

fn user_details(html: &str) -> Option<Value> {
    let caps = USER_DETAILS.captures(html)?;
    // The payload is a JS string literal; its escapes are valid JSON escapes.
    let unescaped: String = match serde_json::from_str(&format!("\"{}\"", &caps[1])) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!("userDetails string literal did not decode: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&unescaped) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("userDetails payload is not JSON: {}", e);
            None
        }
    }
}

fn detail_username(details: Option<&Value>, color: Color) -> Option<String> {
    details?
        .get(color.as_str())?
        .get("username")?
        .as_str()
        .map(str::to_string)
        .and_then(non_empty)
}

fn detail_game_rating(details: Option<&Value>, color: Color) -> Field<u32> {
    let raw = details
        .and_then(|d| d.get(color.as_str()))
        .and_then(|side| side.get("gameRating"));
    match raw {
        None | Some(Value::Null) => Field::Missing,
        Some(v) => match v.as_u64().and_then(|n| u32::try_from(n).ok()).filter(|n| *n > 0) {
            Some(n) => Field::Value(n),
            None => Field::Malformed(v.to_string()),
        },
    }
}

// ── DOM ────────────────────────────────────────────────────────────────

fn card_username(root: ElementRef<'_>, slot: &str) -> Option<String> {
    let css = format!(
        "[data-cy='analysis-player-{slot}'] [data-test-element='user-tagline-username']"
    );
    first_text(root, &css).and_then(non_empty)
}

/// The `.game-overview-row` whose title contains `title`.
fn overview_row<'a>(root: ElementRef<'a>, title: &str) -> Option<ElementRef<'a>> {
    let title_selector = selector(".game-overview-row-title");
    root.select(&selector(".game-overview-row")).find(|row| {
        row.select(&title_selector)
            .next()
            .map(element_text)
            .is_some_and(|t| t.contains(title))
    })
}

fn read_accuracy(root: ElementRef<'_>) -> ByColor<Field<f64>> {
    let mut accuracy = ByColor::new(Field::Missing, Field::Missing);

    if let Some(row) = overview_row(root, "Accuracy") {
        for color in Color::BOTH {
            let css = format!(
                ".review-accuracy-{c} span, [data-cy*='accuracy-{c}'] span",
                c = color.as_str()
            );
            *accuracy.get_mut(color) = Field::parse_text(first_text(row, &css), parse_accuracy);
        }
        if accuracy.white.is_missing() && accuracy.black.is_missing() {
            let items: Vec<String> = row
                .select(&selector(".game-overview-row-item"))
                .map(element_text)
                .collect();
            if let [white, black, ..] = items.as_slice() {
                accuracy.white = Field::parse_text(Some(white.clone()), parse_accuracy);
                accuracy.black = Field::parse_text(Some(black.clone()), parse_accuracy);
            }
        }
    }

    if accuracy.white.is_missing() && accuracy.black.is_missing() {
        let css = "[data-cy^='review-accuracy-'], [data-cy^='game-review-accuracy-']";
        for el in root.select(&selector(css)) {
            let data_cy = el.value().attr("data-cy").unwrap_or_default();
            let field = match first_text(el, "span").and_then(non_empty) {
                Some(text) => Field::parse_text(Some(text), parse_accuracy),
                // Some layouts carry only the value x10 in the attribute suffix.
                None => match data_cy
                    .rsplit('-')
                    .next()
                    .and_then(|s| s.parse::<u32>().ok())
                    .map(|v| f64::from(v) / 10.0)
                    .filter(|v| (0.0..=100.0).contains(v))
                {
                    Some(v) => Field::Value(v),
                    None => Field::Malformed(data_cy.to_string()),
                },
            };
            if data_cy.contains("white") || has_class(el, "review-accuracy-white") {
                fallback(&mut accuracy.white, || field);
            } else if data_cy.contains("black") || has_class(el, "review-accuracy-black") {
                fallback(&mut accuracy.black, || field);
            }
        }
    }

    accuracy
}

fn read_ratings(root: ElementRef<'_>) -> ByColor<Field<u32>> {
    let mut ratings = ByColor::new(Field::Missing, Field::Missing);

    // Preferred: the rating is the numeric suffix of data-cy="review-rating-1300".
    for el in root.select(&selector("[data-cy^='review-rating-']")) {
        let data_cy = el.value().attr("data-cy").unwrap_or_default();
        let suffix = data_cy.rsplit('-').next().map(str::to_string);
        let field = Field::parse_text(suffix, parse_rating);
        if has_class(el, "review-rating-white") {
            fallback(&mut ratings.white, || field);
        } else if has_class(el, "review-rating-black") {
            fallback(&mut ratings.black, || field);
        }
    }

    if !ratings.white.is_value() || !ratings.black.is_value() {
        if let Some(row) = overview_row(root, "Game Rating") {
            for color in Color::BOTH {
                let css = format!(".review-rating-{} span", color.as_str());
                fallback(ratings.get_mut(color), || {
                    Field::parse_text(first_text(row, &css), parse_rating)
                });
            }
        }
    }

    ratings
}

// ── embedded PGN ───────────────────────────────────────────────────────

fn embedded_result(html: &str) -> Field<GameResult> {
    let Some(caps) = PGN_SCRIPT.captures(html) else {
        return Field::Missing;
    };
    let pgn = caps[1]
        .replace("\\/", "/")
        .replace("\\\"", "\"")
        .replace("\\n", "\n");
    match parse_pgn_tags(&pgn).tag("Result") {
        None => Field::Missing,
        Some(marker) => match marker.parse::<GameResult>() {
            Ok(result) => Field::Value(result),
            Err(_) => Field::Malformed(marker.trim().to_string()),
        },
    }
}
