//! Block colors and themes.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// An opaque block color written into grid cells.
///
/// The value is a `0xRRGGBB` triple. Any value, including black, marks a cell as
/// filled; emptiness is expressed with `Option<Color>` on the grid instead of a
/// sentinel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    /// Neutral gray used when a palette has no colors.
    pub const FALLBACK_GRAY: Self = Self(0x88_88_88);

    /// Creates a color from a `0xRRGGBB` value. Bits above the low 24 are dropped.
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }

    /// Returns the `0xRRGGBB` value.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// An ordered, non-empty set of block colors shapes are painted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Creates a palette, substituting [`Color::FALLBACK_GRAY`] when `colors` is empty.
    #[must_use]
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        let mut colors: Vec<Color> = colors.into_iter().collect();
        if colors.is_empty() {
            colors.push(Color::FALLBACK_GRAY);
        }
        Self { colors }
    }

    /// Returns the colors in palette order. Never empty.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the number of colors. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; provided for API symmetry with [`Palette::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the color at `index`, wrapping around the palette length.
    #[must_use]
    pub fn color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Theme::default().palette()
    }
}

/// A cosmetic theme. Only the block palette matters to the game rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    name: &'static str,
    block_colors: &'static [Color],
}

macro_rules! colors {
    ($($rgb:literal),* $(,)?) => {
        &[$(Color::from_rgb($rgb)),*]
    };
}

impl Theme {
    /// Bright default theme.
    pub const VIBRANT: Self = Self {
        name: "Vibrant",
        block_colors: colors![
            0xff6b6b, 0x48e6e6, 0x6b8cff, 0x7fffd4, 0xffd86b, 0x9dff6b, 0xff6bff, 0x6bffb2,
        ],
    };
    /// Greens and olives.
    pub const FOREST: Self = Self {
        name: "Forest",
        block_colors: colors![
            0x228b22, 0x6b8e23, 0x8fbc8f, 0x556b2f, 0xbdb76b, 0x2e8b57, 0x3cb371, 0x9acd32,
        ],
    };
    /// Saturated neon colors.
    pub const NEON: Self = Self {
        name: "Neon",
        block_colors: colors![
            0x39ff14, 0xff073a, 0x00f0ff, 0xfffb00, 0xff00fb, 0x00ff90, 0xffa600, 0x00ffea,
        ],
    };
    /// Soft pastel colors.
    pub const PASTEL: Self = Self {
        name: "Pastel",
        block_colors: colors![
            0xffb3ba, 0xbaffc9, 0xbae1ff, 0xffffba, 0xffdfba, 0xc9baff, 0xbaffff, 0xffbae1,
        ],
    };
    /// Blues and violets.
    pub const SPACE: Self = Self {
        name: "Space",
        block_colors: colors![
            0x6b6bff, 0x8c6bff, 0x6b8cff, 0x48e6e6, 0x7fffd4, 0x2222ff, 0x9dff6b, 0x6bffb2,
        ],
    };
    /// Okabe-Ito palette, distinguishable with color vision deficiencies.
    pub const COLORBLIND: Self = Self {
        name: "Colorblind",
        block_colors: colors![
            0x000000, 0xe69f00, 0x56b4e9, 0x009e73, 0xf0e442, 0x0072b2, 0xd55e00, 0xcc79a7,
        ],
    };

    /// All built-in themes in menu order.
    pub const ALL: [Self; 6] = [
        Self::VIBRANT,
        Self::FOREST,
        Self::NEON,
        Self::PASTEL,
        Self::SPACE,
        Self::COLORBLIND,
    ];

    /// Creates a custom theme.
    #[must_use]
    pub const fn new(name: &'static str, block_colors: &'static [Color]) -> Self {
        Self { name, block_colors }
    }

    /// Looks up a built-in theme by name, ignoring ASCII case.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name.eq_ignore_ascii_case(name))
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the block palette, falling back to gray for a theme without colors.
    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::new(self.block_colors.iter().copied())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::VIBRANT
    }
}
