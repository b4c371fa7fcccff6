use chrono::{Datelike as _, NaiveDate};
use log::debug;
use timbertiles_core::{Grid, Position, Shape};

use crate::{SeededRng, ShapeSampler};

/// Number of single cells filled on a daily challenge board.
pub const DAILY_PREFILLED_CELLS: usize = 8;

/// Builds the seed string for a calendar date: `year-month-day` without padding.
///
/// ```
/// use chrono::NaiveDate;
/// use timbertiles_generator::daily_seed;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
/// assert_eq!(daily_seed(date), "2025-1-9");
/// ```
#[must_use]
pub fn daily_seed(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// The board and tray everybody plays on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyChallenge {
    /// Seed string the challenge was generated from.
    pub seed: String,
    /// Starting board.
    pub grid: Grid,
    /// Starting tray.
    pub tray: [Shape; 3],
}

impl DailyChallenge {
    /// Generates the challenge for `date`.
    ///
    /// See [`DailyChallenge::from_seed`].
    ///
    /// # Panics
    ///
    /// Panics if `grid_size` is zero.
    #[must_use]
    pub fn generate(date: NaiveDate, sampler: &ShapeSampler, grid_size: usize) -> Self {
        Self::from_seed(&daily_seed(date), sampler, grid_size)
    }

    /// Generates a challenge from an arbitrary seed string.
    ///
    /// Draws happen in a fixed order: pattern then color for each of the three
    /// tray shapes, then row, column and color for each of the
    /// [`DAILY_PREFILLED_CELLS`] board cells. Cells may repeat; a later draw
    /// overwrites the earlier color.
    ///
    /// # Panics
    ///
    /// Panics if `grid_size` is zero.
    #[must_use]
    pub fn from_seed(seed: &str, sampler: &ShapeSampler, grid_size: usize) -> Self {
        let mut rng = SeededRng::new(seed);
        let tray = sampler.sample_tray(&mut rng);

        let mut grid = Grid::new(grid_size);
        let palette = sampler.palette();
        for _ in 0..DAILY_PREFILLED_CELLS {
            let row = rng.index(grid_size);
            let col = rng.index(grid_size);
            let color = palette.color(rng.index(palette.len()));
            // Indices come from `index(grid_size)` so they are always in range.
            let _ = grid.set(Position::new(row, col), Some(color));
        }

        debug!(
            "generated daily challenge {seed}: {} prefilled cells",
            grid.occupied_count()
        );
        Self {
            seed: seed.to_owned(),
            grid,
            tray,
        }
    }
}

#[cfg(test)]
mod tests {
    use timbertiles_core::{Color, Difficulty, Theme};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_seed_is_unpadded() {
        assert_eq!(daily_seed(date(2024, 12, 25)), "2024-12-25");
        assert_eq!(daily_seed(date(2024, 2, 3)), "2024-2-3");
    }

    #[test]
    fn test_same_day_same_challenge() {
        let sampler = ShapeSampler::new(Difficulty::Difficult, Theme::NEON.palette());
        let a = DailyChallenge::generate(date(2024, 6, 1), &sampler, 9);
        let b = DailyChallenge::generate(date(2024, 6, 1), &sampler, 9);
        assert_eq!(a, b);
        assert_eq!(a.grid.size(), 9);
    }

    #[test]
    fn test_board_has_at_most_eight_cells() {
        let sampler = ShapeSampler::new(Difficulty::Easy, Theme::default().palette());
        for day in 1..=28 {
            let challenge = DailyChallenge::generate(date(2023, 2, day), &sampler, 10);
            let filled = challenge.grid.occupied_count();
            assert!((1..=DAILY_PREFILLED_CELLS).contains(&filled), "{filled}");
        }
    }

    #[test]
    fn test_replays_draw_order() {
        let palette = Theme::PASTEL.palette();
        let sampler = ShapeSampler::new(Difficulty::Easy, palette.clone());
        let challenge = DailyChallenge::from_seed("2024-7-4", &sampler, 10);

        let mut rng = SeededRng::new("2024-7-4");
        let patterns = Difficulty::Easy.patterns();
        for shape in &challenge.tray {
            assert_eq!(shape.pattern(), &patterns[rng.index(patterns.len())]);
            assert_eq!(shape.color(), palette.color(rng.index(palette.len())));
        }
        let mut expected = Grid::new(10);
        for _ in 0..DAILY_PREFILLED_CELLS {
            let pos = Position::new(rng.index(10), rng.index(10));
            expected
                .set(pos, Some(palette.color(rng.index(palette.len()))))
                .unwrap();
        }
        assert_eq!(challenge.grid, expected);
    }

    #[test]
    fn test_new_year_2024_board() {
        let palette = Theme::VIBRANT.palette();
        let sampler = ShapeSampler::new(Difficulty::Easy, palette.clone());
        let challenge = DailyChallenge::generate(date(2024, 1, 1), &sampler, 10);
        assert_eq!(challenge.seed, "2024-1-1");

        let tray: Vec<(String, u32)> = challenge
            .tray
            .iter()
            .map(|shape| (shape.pattern().to_string(), shape.color().rgb()))
            .collect();
        assert_eq!(
            tray,
            [
                ("#./#.".to_owned(), 0x9dff6b),
                ("#./#.".to_owned(), 0x9dff6b),
                ("#./##".to_owned(), 0x48e6e6),
            ]
        );

        let mut expected = Grid::new(10);
        for (row, col, rgb) in [
            (0, 2, 0xff6b6b),
            (0, 4, 0xffd86b),
            (4, 4, 0xff6bff),
            (7, 7, 0x9dff6b),
            (1, 7, 0xff6b6b),
            (8, 7, 0xff6b6b),
            (5, 9, 0xff6b6b),
            (2, 5, 0xff6bff),
        ] {
            expected
                .set(Position::new(row, col), Some(Color::from_rgb(rgb)))
                .unwrap();
        }
        assert_eq!(challenge.grid, expected);
    }

    #[test]
    fn test_different_days_differ() {
        let sampler = ShapeSampler::new(Difficulty::Easy, Theme::default().palette());
        let a = DailyChallenge::generate(date(2024, 6, 1), &sampler, 10);
        let b = DailyChallenge::generate(date(2024, 6, 2), &sampler, 10);
        assert_ne!(a.grid, b.grid);
    }
}
