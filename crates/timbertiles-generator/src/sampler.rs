use rand::{RngExt as _, SeedableRng as _};
use rand_pcg::Pcg64;
use timbertiles_core::{Difficulty, Palette, Shape};

use crate::SeededRng;

/// A source of uniformly distributed indices.
///
/// Implemented for the ordinary [`Pcg64`] generator and for the deterministic
/// [`SeededRng`], so the same sampling code serves regular and daily play.
pub trait Draw {
    /// Draws an index in `0..len`.
    ///
    /// # Panics
    ///
    /// Implementations panic if `len` is zero.
    fn draw_index(&mut self, len: usize) -> usize;
}

impl Draw for SeededRng {
    fn draw_index(&mut self, len: usize) -> usize {
        self.index(len)
    }
}

impl Draw for Pcg64 {
    fn draw_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Creates a [`Pcg64`] from `seed`, or from a random seed when `None`.
#[must_use]
pub fn shape_rng(seed: Option<u64>) -> Pcg64 {
    Pcg64::seed_from_u64(seed.unwrap_or_else(rand::random))
}

/// Draws tray shapes for one difficulty tier and palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSampler {
    difficulty: Difficulty,
    palette: Palette,
}

impl ShapeSampler {
    /// Creates a sampler.
    #[must_use]
    pub fn new(difficulty: Difficulty, palette: Palette) -> Self {
        Self {
            difficulty,
            palette,
        }
    }

    /// Returns the tier whose catalog is sampled.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the palette colors are drawn from.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Draws one shape: a pattern index first, then a color index.
    ///
    /// Both draws are uniform. The draw order is fixed because the daily
    /// challenge replays it from a seed.
    pub fn sample<R>(&self, rng: &mut R) -> Shape
    where
        R: Draw + ?Sized,
    {
        let patterns = self.difficulty.patterns();
        let pattern = patterns[rng.draw_index(patterns.len())].clone();
        let color = self.palette.color(rng.draw_index(self.palette.len()));
        Shape::new(pattern, color)
    }

    /// Draws three shapes for a full tray.
    pub fn sample_tray<R>(&self, rng: &mut R) -> [Shape; 3]
    where
        R: Draw + ?Sized,
    {
        [self.sample(rng), self.sample(rng), self.sample(rng)]
    }
}
