use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid, zero-based from the top-left corner.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({row}, {col})")]
pub struct Position {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Position {
    /// Creates a position from a row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Resolves `anchor + offset` along both axes, returning `None` when the result
    /// would be negative.
    ///
    /// Anchors are signed because a dragged piece may hover with its origin above
    /// or left of the grid while some of its cells are still inside it.
    #[must_use]
    pub fn offset_from(anchor_row: i32, anchor_col: i32, dr: usize, dc: usize) -> Option<Self> {
        Some(Self {
            row: offset(anchor_row, dr)?,
            col: offset(anchor_col, dc)?,
        })
    }
}

fn offset(anchor: i32, delta: usize) -> Option<usize> {
    let delta = i64::try_from(delta).ok()?;
    usize::try_from(i64::from(anchor) + delta).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from_handles_negative_anchor() {
        assert_eq!(Position::offset_from(-1, 2, 1, 0), Some(Position::new(0, 2)));
        assert_eq!(Position::offset_from(-2, 0, 1, 0), None);
        assert_eq!(Position::offset_from(3, 4, 2, 1), Some(Position::new(5, 5)));
    }
}
