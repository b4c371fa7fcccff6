//! Score, coin and remedy pricing rules.

use timbertiles_core::Position;

use crate::GameMode;

/// Points that earn one coin.
pub const SCORE_PER_COIN: u32 = 100;

/// Coins earned when the score moves from `before` to `after`.
///
/// One coin is granted for each multiple of [`SCORE_PER_COIN`] crossed on the way
/// up. A decrease grants nothing and never takes coins back.
///
/// ```
/// use timbertiles_game::coins_for_increment;
///
/// assert_eq!(coins_for_increment(0, 150), 1);
/// assert_eq!(coins_for_increment(150, 100), 0);
/// assert_eq!(coins_for_increment(100, 199), 0);
/// assert_eq!(coins_for_increment(95, 310), 3);
/// ```
#[must_use]
pub fn coins_for_increment(before: u32, after: u32) -> u32 {
    (after / SCORE_PER_COIN).saturating_sub(before / SCORE_PER_COIN)
}

/// A paid removal that bypasses normal placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Remedy {
    /// Empty a whole row.
    #[display("row {_0}")]
    Row(usize),
    /// Empty a whole column.
    #[display("column {_0}")]
    Column(usize),
    /// Empty one cell.
    #[display("cell {_0}")]
    Cell(Position),
}

/// What a [`Remedy`] is paid with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum Cost {
    /// Deducted from the session score.
    #[display("{_0} points")]
    Score(u32),
    /// Deducted from the coin balance.
    #[display("{_0} coins")]
    Coins(u32),
}

impl Remedy {
    /// Returns the price in `mode`.
    ///
    /// Endless sessions pay with score (50 for a line, 20 for a cell); every
    /// other mode pays with coins (5 for a line, 2 for a cell).
    #[must_use]
    pub fn cost(self, mode: GameMode) -> Cost {
        let is_cell = matches!(self, Self::Cell(_));
        if mode.is_endless() {
            Cost::Score(if is_cell { 20 } else { 50 })
        } else {
            Cost::Coins(if is_cell { 2 } else { 5 })
        }
    }

    /// Returns the price of the cheapest remedy in `mode`.
    #[must_use]
    pub fn cheapest_cost(mode: GameMode) -> Cost {
        Self::Cell(Position::new(0, 0)).cost(mode)
    }
}
