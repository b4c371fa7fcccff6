//! Shape patterns and colored shapes.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::Color;

/// Errors that can occur when building a [`ShapePattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    /// The pattern has no rows, or its rows have no cells.
    #[display("shape pattern is empty")]
    Empty,
    /// A row is wider or narrower than the first row.
    #[display("shape pattern row {row} has width {width}, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Width of the offending row.
        width: usize,
        /// Width of the first row.
        expected: usize,
    },
    /// The text form contains a character other than `#`, `.` or `/`.
    #[display("invalid shape pattern character {ch:?}")]
    InvalidChar {
        /// The rejected character.
        ch: char,
    },
}

/// A rectangular boolean mask describing which cells a shape occupies.
///
/// Patterns are kept exactly as authored: leading or trailing rows and columns
/// without any occupied cell are preserved and still count towards the bounding
/// box. A pattern is always at least 1×1 and every row has the same width; this is
/// checked once at construction so placement code can rely on it.
///
/// The text form uses `#` for an occupied cell, `.` for a free one and `/` between
/// rows:
///
/// ```
/// use timbertiles_core::ShapePattern;
///
/// let l: ShapePattern = "#./#./##".parse().unwrap();
/// assert_eq!((l.height(), l.width()), (3, 2));
/// assert_eq!(l.cell_count(), 4);
/// assert_eq!(l.to_string(), "#./#./##");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct ShapePattern {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl ShapePattern {
    /// Builds a pattern from rows of booleans.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Empty`] if there are no rows or the first row is empty,
    /// and [`ShapeError::Ragged`] if rows differ in width.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, ShapeError>
    where
        R: AsRef<[bool]>,
    {
        let Some(first) = rows.first() else {
            return Err(ShapeError::Empty);
        };
        let width = first.as_ref().len();
        if width == 0 {
            return Err(ShapeError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, cols) in rows.iter().enumerate() {
            let cols = cols.as_ref();
            if cols.len() != width {
                return Err(ShapeError::Ragged {
                    row,
                    width: cols.len(),
                    expected: width,
                });
            }
            cells.extend_from_slice(cols);
        }
        Ok(Self {
            height: rows.len(),
            width,
            cells,
        })
    }

    /// Number of rows in the bounding box.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns in the bounding box.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns whether the cell at `(row, col)` relative to the origin is occupied.
    /// Cells outside the bounding box are reported as free.
    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    /// Iterates over the `(row, col)` offsets of occupied cells in row-major order.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|filled| **filled).count()
    }

    /// Iterates over the rows of the mask.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks(self.width)
    }
}

impl FromStr for ShapePattern {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split('/')
            .map(|row| {
                row.chars()
                    .map(|ch| match ch {
                        '#' => Ok(true),
                        '.' => Ok(false),
                        _ => Err(ShapeError::InvalidChar { ch }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(&rows)
    }
}

impl Display for ShapePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for filled in row {
                f.write_str(if *filled { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u8>>> for ShapePattern {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let rows: Vec<Vec<bool>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| v != 0).collect())
            .collect();
        Self::from_rows(&rows)
    }
}

impl From<ShapePattern> for Vec<Vec<u8>> {
    fn from(pattern: ShapePattern) -> Self {
        pattern
            .rows()
            .map(|row| row.iter().map(|filled| u8::from(*filled)).collect())
            .collect()
    }
}

/// A piece offered in the tray: an immutable pattern painted with one color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pattern: ShapePattern,
    color: Color,
}

impl Shape {
    /// Creates a shape.
    #[must_use]
    pub fn new(pattern: ShapePattern, color: Color) -> Self {
        Self { pattern, color }
    }

    /// Returns the occupancy mask.
    #[must_use]
    pub fn pattern(&self) -> &ShapePattern {
        &self.pattern
    }

    /// Returns the color written into the grid on placement.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
}
