use serde::{Deserialize, Serialize};

use crate::types::{ByColor, Color};

/// Move-quality label assigned by a game review.
///
/// The set is closed: every review reports exactly these ten categories per
/// side, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    /// A sacrifice or only-move the engine rates above best.
    Brilliant,
    /// A hard-to-find move that changes the evaluation.
    Great,
    /// Opening theory.
    Book,
    Best,
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    /// A missed tactical opportunity.
    Miss,
    Blunder,
}

impl MoveCategory {
    pub const ALL: [MoveCategory; 10] = [
        MoveCategory::Brilliant,
        MoveCategory::Great,
        MoveCategory::Book,
        MoveCategory::Best,
        MoveCategory::Excellent,
        MoveCategory::Good,
        MoveCategory::Inaccuracy,
        MoveCategory::Mistake,
        MoveCategory::Miss,
        MoveCategory::Blunder,
    ];

    /// Position of this category in [`MoveCategory::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase key, used as the column prefix in the `games` table.
    pub fn key(self) -> &'static str {
        match self {
            Self::Brilliant => "brilliant",
            Self::Great => "great",
            Self::Book => "book",
            Self::Best => "best",
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Inaccuracy => "inaccuracy",
            Self::Mistake => "mistake",
            Self::Miss => "miss",
            Self::Blunder => "blunder",
        }
    }

    /// Label the review page uses in its `game-review-tallies-number-*` nodes.
    pub fn page_label(self) -> &'static str {
        match self {
            Self::Brilliant => "Brilliant",
            Self::Great => "GreatFind",
            Self::Book => "Book",
            Self::Best => "BestMove",
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Inaccuracy => "Inaccuracy",
            Self::Mistake => "Mistake",
            Self::Miss => "Miss",
            Self::Blunder => "Blunder",
        }
    }

    /// Whether the category counts against the player.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::Inaccuracy | Self::Mistake | Self::Miss | Self::Blunder
        )
    }
}

impl std::fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Brilliant => "Brilliant",
            Self::Great => "Great",
            Self::Book => "Book",
            Self::Best => "Best",
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Inaccuracy => "Inaccuracy",
            Self::Mistake => "Mistake",
            Self::Miss => "Miss",
            Self::Blunder => "Blunder",
        };
        f.write_str(name)
    }
}

/// Per-side move counts for all ten categories of one game.
///
/// Every category is always present; a category the review did not show is
/// a zero, never missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tallies([ByColor<u32>; 10]);

impl Tallies {
    pub fn get(&self, category: MoveCategory) -> ByColor<u32> {
        self.0[category.index()]
    }

    pub fn count(&self, category: MoveCategory, color: Color) -> u32 {
        *self.0[category.index()].get(color)
    }

    pub fn set(&mut self, category: MoveCategory, counts: ByColor<u32>) {
        self.0[category.index()] = counts;
    }

    /// Builder-style [`Tallies::set`].
    pub fn with(mut self, category: MoveCategory, white: u32, black: u32) -> Self {
        self.set(category, ByColor::new(white, black));
        self
    }

    /// Number of reviewed plies for one side (the sum over every category).
    pub fn side_total(&self, color: Color) -> u32 {
        self.0.iter().map(|pair| *pair.get(color)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoveCategory, ByColor<u32>)> + '_ {
        MoveCategory::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

/// Category sums across many games, used by summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals([u64; 10]);

impl CategoryTotals {
    pub fn get(&self, category: MoveCategory) -> u64 {
        self.0[category.index()]
    }

    pub fn add(&mut self, category: MoveCategory, count: u32) {
        self.0[category.index()] += u64::from(count);
    }

    /// Add one side's counts from a game.
    pub fn add_side(&mut self, tallies: &Tallies, color: Color) {
        for category in MoveCategory::ALL {
            self.add(category, tallies.count(category, color));
        }
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoveCategory, u64)> + '_ {
        MoveCategory::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}
