//! Shape catalogs for each difficulty tier.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::ShapePattern;

/// Difficulty tier. Selects the shape catalog and the default grid size.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Small, regular pieces on the larger board.
    #[default]
    #[display("easy")]
    Easy,
    /// The easy pieces plus large and irregular ones, on the smaller board.
    #[display("difficult")]
    Difficult,
}

impl Difficulty {
    /// All tiers in menu order.
    pub const ALL: [Self; 2] = [Self::Easy, Self::Difficult];

    /// Returns the patterns shapes are drawn from for this tier.
    ///
    /// The difficult list starts with the complete easy list, so index `i` names the
    /// same pattern in both tiers for every `i` below the easy length.
    #[must_use]
    pub fn patterns(self) -> &'static [ShapePattern] {
        match self {
            Self::Easy => &EASY_PATTERNS,
            Self::Difficult => &DIFFICULT_PATTERNS,
        }
    }

    /// Returns the side length of the board used by this tier.
    #[must_use]
    pub const fn default_grid_size(self) -> usize {
        match self {
            Self::Easy => 10,
            Self::Difficult => 9,
        }
    }

    /// Returns the tier after this one, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Easy => Self::Difficult,
            Self::Difficult => Self::Easy,
        }
    }
}

// Duplicates are intentional: they weight the draw towards those pieces.
const EASY_PATTERN_TEXT: &[&str] = &[
    "##/##",
    "####",
    "#./##",
    "##./.##",
    ".##/##.",
    "#./#.",
    "#/#/#",
    "###/..#",
    "###/#..",
    "##/#.",
    "##/.#",
    "###",
    "#/#/#",
    "##",
    "#/#",
    "#",
    ".#./###",
    "###/.#.",
];

const DIFFICULT_EXTRA_PATTERN_TEXT: &[&str] = &[
    "#./#./##",
    "###/.#.",
    ".#./###/.#.",
    "#../#../###",
    "#../#../###",
    "###/###/###",
    "#####",
    "#/#/#/#",
    "#/#/#/#/#",
    "###/..#/..#",
    "..#/..#/###",
    "..#/..#/###",
    "###/#../#..",
    "###/..#/..#",
    "#.#/#.#/###",
    "###/#.#/#.#",
    "###/#.#/###",
    "###/.#./###",
    "###/#.#/###",
    "#.#/###",
    "###/#.#",
    "##/#./##",
    "##/.#/##",
    "#./##/.#",
    ".#/##/#.",
    "#./##/#.",
    ".#/##/.#",
];

fn parse_catalog<'a>(text: impl IntoIterator<Item = &'a &'a str>) -> Vec<ShapePattern> {
    text.into_iter()
        .map(|pattern| {
            pattern
                .parse()
                .unwrap_or_else(|e| panic!("invalid catalog pattern {pattern:?}: {e}"))
        })
        .collect()
}

static EASY_PATTERNS: LazyLock<Vec<ShapePattern>> =
    LazyLock::new(|| parse_catalog(EASY_PATTERN_TEXT));

static DIFFICULT_PATTERNS: LazyLock<Vec<ShapePattern>> = LazyLock::new(|| {
    parse_catalog(EASY_PATTERN_TEXT.iter().chain(DIFFICULT_EXTRA_PATTERN_TEXT))
});
