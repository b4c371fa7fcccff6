//! The square occupancy grid and its placement and line-clear rules.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{Color, Position, Shape};

/// Errors reported by [`Grid`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    /// A covered cell is outside the grid or already filled.
    #[display("shape does not fit with its origin at row {row}, column {col}")]
    IllegalPlacement {
        /// Requested origin row.
        row: i32,
        /// Requested origin column.
        col: i32,
    },
    /// A cell position lies outside the grid.
    #[display("cell {position} is outside the {size}x{size} grid")]
    CellOutOfBounds {
        /// The rejected position.
        position: Position,
        /// Side length of the grid.
        size: usize,
    },
    /// A row or column index lies outside the grid.
    #[display("line {index} is outside the {size}x{size} grid")]
    LineOutOfBounds {
        /// The rejected index.
        index: usize,
        /// Side length of the grid.
        size: usize,
    },
    /// Rows given to [`Grid::from_rows`] do not form a non-empty square.
    #[display("grid rows do not form a square: row {row} has {len} cells, expected {size}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Length of the offending row.
        len: usize,
        /// Expected side length.
        size: usize,
    },
    /// [`Grid::from_rows`] was given no rows.
    #[display("grid has no rows")]
    Empty,
}

/// A cell written by a grid operation, together with the value it held before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedCell {
    /// The cell that changed.
    pub position: Position,
    /// Its value before the change.
    pub previous: Option<Color>,
}

/// Result of [`Grid::clear_full_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClear {
    cleared_rows: Vec<usize>,
    cleared_columns: Vec<usize>,
    cleared_cells: Vec<PlacedCell>,
}

impl LineClear {
    /// Indices of rows that were full, in ascending order.
    #[must_use]
    pub fn cleared_rows(&self) -> &[usize] {
        &self.cleared_rows
    }

    /// Indices of columns that were full, in ascending order.
    #[must_use]
    pub fn cleared_columns(&self) -> &[usize] {
        &self.cleared_columns
    }

    /// Every emptied cell with its previous color. A cell at the intersection of a
    /// cleared row and a cleared column appears once.
    #[must_use]
    pub fn cleared_cells(&self) -> &[PlacedCell] {
        &self.cleared_cells
    }

    /// Number of cleared rows plus number of cleared columns.
    ///
    /// Intersections are not deduplicated: a full row crossing a full column counts
    /// as two lines.
    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.cleared_rows.len() + self.cleared_columns.len()
    }

    /// Returns `true` if nothing was cleared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines_cleared() == 0
    }

    /// Score bonus for this clear. See [`line_clear_bonus`].
    #[must_use]
    pub fn bonus(&self) -> u32 {
        line_clear_bonus(self.lines_cleared())
    }
}

/// Score bonus for clearing `lines` lines at once.
///
/// Each line is worth 10 points and every line beyond the first adds a 5 point
/// combo bonus: `10 * n + 5 * (n - 1)` for `n > 1`.
///
/// ```
/// use timbertiles_core::line_clear_bonus;
///
/// assert_eq!(line_clear_bonus(0), 0);
/// assert_eq!(line_clear_bonus(1), 10);
/// assert_eq!(line_clear_bonus(2), 25);
/// assert_eq!(line_clear_bonus(3), 40);
/// ```
#[must_use]
pub fn line_clear_bonus(lines: usize) -> u32 {
    let lines = u32::try_from(lines).unwrap_or(u32::MAX);
    let combo = lines.saturating_sub(1);
    lines.saturating_mul(10).saturating_add(combo.saturating_mul(5))
}

/// An N×N board of cells, each empty or filled with a [`Color`].
///
/// The side length is fixed at construction. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<Color>>>", into = "Vec<Vec<Option<Color>>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Grid {
    /// Creates an empty grid with the given side length.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "grid size must be positive");
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Builds a grid from rows of cells.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Empty`] for no rows and [`GridError::NotSquare`] if any
    /// row length differs from the number of rows.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[Option<Color>]>,
    {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            cells.extend_from_slice(values);
        }
        Ok(Self { size, cells })
    }

    /// Side length of the grid.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `pos` lies inside the grid.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Returns the cell at `pos`, or `None` if `pos` is outside the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Option<Color>> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Returns the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<Color> {
        assert!(self.contains(pos), "{pos} is outside the grid");
        self.cells[self.index(pos)]
    }

    /// Overwrites the cell at `pos` and returns the value it held before.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] if `pos` is outside the grid.
    pub fn set(&mut self, pos: Position, value: Option<Color>) -> Result<Option<Color>, GridError> {
        if !self.contains(pos) {
            return Err(GridError::CellOutOfBounds {
                position: pos,
                size: self.size,
            });
        }
        let index = self.index(pos);
        Ok(std::mem::replace(&mut self.cells[index], value))
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Color>]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Iterates over the positions of filled cells in row-major order.
    pub fn filled_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some())
            .map(|(i, _)| Position::new(i / self.size, i % self.size))
    }

    /// Returns whether `shape` can be placed with its origin at `(row, col)`.
    ///
    /// Every occupied cell of the pattern must land inside the grid on an empty
    /// cell. Free cells of the pattern are ignored, so they may hang off the edge.
    /// A pattern without occupied cells can always be placed.
    #[must_use]
    pub fn can_place(&self, shape: &Shape, row: i32, col: i32) -> bool {
        shape.pattern().offsets().all(|(dr, dc)| {
            Position::offset_from(row, col, dr, dc)
                .and_then(|pos| self.get(pos))
                .is_some_and(|cell| cell.is_none())
        })
    }

    /// Writes `shape`'s color into every cell it covers.
    ///
    /// Returns the covered cells with their previous values.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IllegalPlacement`] without touching the grid if
    /// [`Grid::can_place`] is `false` for this origin.
    pub fn place(&mut self, shape: &Shape, row: i32, col: i32) -> Result<Vec<PlacedCell>, GridError> {
        if !self.can_place(shape, row, col) {
            return Err(GridError::IllegalPlacement { row, col });
        }
        let placed = shape
            .pattern()
            .offsets()
            .filter_map(|(dr, dc)| Position::offset_from(row, col, dr, dc))
            .map(|position| {
                let index = self.index(position);
                let previous = self.cells[index].replace(shape.color());
                PlacedCell { position, previous }
            })
            .collect();
        Ok(placed)
    }

    /// Returns `true` if every cell of `row` is filled.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.size && self.cells[row * self.size..(row + 1) * self.size].iter().all(Option::is_some)
    }

    /// Returns `true` if every cell of `col` is filled.
    #[must_use]
    pub fn is_column_full(&self, col: usize) -> bool {
        col < self.size && (0..self.size).all(|row| self.cells[row * self.size + col].is_some())
    }

    /// Detects every full row and column, then empties all of them.
    ///
    /// Rows and columns are detected against the same board state before anything
    /// is cleared, so a cell shared by a full row and a full column contributes to
    /// both lines.
    pub fn clear_full_lines(&mut self) -> LineClear {
        let cleared_rows: Vec<usize> = (0..self.size).filter(|&r| self.is_row_full(r)).collect();
        let cleared_columns: Vec<usize> =
            (0..self.size).filter(|&c| self.is_column_full(c)).collect();

        let mut cleared_cells = Vec::new();
        for &row in &cleared_rows {
            cleared_cells.extend(self.clear_positions((0..self.size).map(|col| Position::new(row, col))));
        }
        for &col in &cleared_columns {
            cleared_cells.extend(self.clear_positions((0..self.size).map(|row| Position::new(row, col))));
        }

        LineClear {
            cleared_rows,
            cleared_columns,
            cleared_cells,
        }
    }

    /// Empties every cell of `row`, full or not.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::LineOutOfBounds`] if `row` is outside the grid.
    pub fn clear_row(&mut self, row: usize) -> Result<Vec<PlacedCell>, GridError> {
        self.check_line(row)?;
        Ok(self.clear_positions((0..self.size).map(|col| Position::new(row, col))))
    }

    /// Empties every cell of `col`, full or not.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::LineOutOfBounds`] if `col` is outside the grid.
    pub fn clear_column(&mut self, col: usize) -> Result<Vec<PlacedCell>, GridError> {
        self.check_line(col)?;
        Ok(self.clear_positions((0..self.size).map(|row| Position::new(row, col))))
    }

    /// Empties a single cell.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] if `pos` is outside the grid.
    pub fn clear_cell(&mut self, pos: Position) -> Result<Vec<PlacedCell>, GridError> {
        if !self.contains(pos) {
            return Err(GridError::CellOutOfBounds {
                position: pos,
                size: self.size,
            });
        }
        Ok(self.clear_positions(std::iter::once(pos)))
    }

    /// Number of filled cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    fn check_line(&self, index: usize) -> Result<(), GridError> {
        if index < self.size {
            Ok(())
        } else {
            Err(GridError::LineOutOfBounds {
                index,
                size: self.size,
            })
        }
    }

    // Only cells that were filled are reported.
    fn clear_positions(&mut self, positions: impl Iterator<Item = Position>) -> Vec<PlacedCell> {
        positions
            .filter_map(|position| {
                let index = self.index(position);
                self.cells[index].take().map(|color| PlacedCell {
                    position,
                    previous: Some(color),
                })
            })
            .collect()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                f.write_str(if cell.is_some() { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<Option<Color>>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<Option<Color>>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<Option<Color>>> {
    fn from(grid: Grid) -> Self {
        grid.rows().map(<[Option<Color>]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const RED: Color = Color::from_rgb(0xff6b6b);
    const BLUE: Color = Color::from_rgb(0x6b8cff);

    fn shape(text: &str) -> Shape {
        Shape::new(text.parse().unwrap(), RED)
    }

    fn fill_row_except(grid: &mut Grid, row: usize, skip: &[usize]) {
        for col in 0..grid.size() {
            if !skip.contains(&col) {
                grid.set(Position::new(row, col), Some(BLUE)).unwrap();
            }
        }
    }

    #[test]
    fn test_can_place_checks_bounds_and_occupancy() {
        let mut grid = Grid::new(5);
        let square = shape("##/##");
        assert!(grid.can_place(&square, 0, 0));
        assert!(grid.can_place(&square, 3, 3));
        assert!(!grid.can_place(&square, 4, 0));
        assert!(!grid.can_place(&square, 0, 4));
        assert!(!grid.can_place(&square, -1, 0));

        grid.set(Position::new(1, 1), Some(BLUE)).unwrap();
        assert!(!grid.can_place(&square, 0, 0));
        assert!(grid.can_place(&square, 2, 2));
    }

    #[test]
    fn test_free_pattern_cells_may_hang_off_the_grid() {
        let grid = Grid::new(3);
        // Occupied cells are all in the left column.
        let pillar = shape("#./#./#.");
        assert!(grid.can_place(&pillar, 0, 2));
        let right = shape(".#/.#");
        assert!(grid.can_place(&right, 0, -1));
        let hook = shape(".#/##");
        assert!(!grid.can_place(&hook, 0, -1));
    }

    #[test]
    fn test_pattern_without_cells_is_always_placeable() {
        let mut grid = Grid::new(2);
        fill_row_except(&mut grid, 0, &[]);
        fill_row_except(&mut grid, 1, &[]);
        let ghost = shape("../..");
        assert!(grid.can_place(&ghost, 0, 0));
        assert!(grid.can_place(&ghost, 7, -3));
    }

    #[test]
    fn test_place_writes_color_and_reports_previous() {
        let mut grid = Grid::new(4);
        let placed = grid.place(&shape("##/.#"), 1, 2).unwrap();
        assert_eq!(
            placed,
            vec![
                PlacedCell {
                    position: Position::new(1, 2),
                    previous: None
                },
                PlacedCell {
                    position: Position::new(1, 3),
                    previous: None
                },
                PlacedCell {
                    position: Position::new(2, 3),
                    previous: None
                },
            ]
        );
        assert_eq!(grid.cell(Position::new(2, 3)), Some(RED));
        assert_eq!(grid.cell(Position::new(2, 2)), None);
        assert_eq!(grid.occupied_count(), 3);
    }

    #[test]
    fn test_place_rejects_illegal_origin_without_mutation() {
        let mut grid = Grid::new(4);
        grid.set(Position::new(0, 1), Some(BLUE)).unwrap();
        let before = grid.clone();
        assert_eq!(
            grid.place(&shape("###"), 0, 0),
            Err(GridError::IllegalPlacement { row: 0, col: 0 })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_single_row_clear() {
        let mut grid = Grid::new(5);
        fill_row_except(&mut grid, 0, &[4]);
        grid.set(Position::new(2, 0), Some(BLUE)).unwrap();
        grid.place(&shape("#"), 0, 4).unwrap();

        let clear = grid.clear_full_lines();
        assert_eq!(clear.lines_cleared(), 1);
        assert_eq!(clear.cleared_rows(), &[0]);
        assert!(clear.cleared_columns().is_empty());
        assert_eq!(clear.cleared_cells().len(), 5);
        assert_eq!(clear.bonus(), 10);
        assert!(grid.rows().next().unwrap().iter().all(Option::is_none));
        assert_eq!(grid.cell(Position::new(2, 0)), Some(BLUE));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_crossing_row_and_column_count_as_two_lines() {
        let mut grid = Grid::new(4);
        fill_row_except(&mut grid, 2, &[]);
        for row in 0..4 {
            grid.set(Position::new(row, 1), Some(BLUE)).unwrap();
        }

        let clear = grid.clear_full_lines();
        assert_eq!(clear.cleared_rows(), &[2]);
        assert_eq!(clear.cleared_columns(), &[1]);
        assert_eq!(clear.lines_cleared(), 2);
        assert_eq!(clear.bonus(), 25);
        // 4 + 4 cells, the shared one reported once.
        assert_eq!(clear.cleared_cells().len(), 7);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_no_clear_when_nothing_is_full() {
        let mut grid = Grid::new(3);
        fill_row_except(&mut grid, 1, &[2]);
        let clear = grid.clear_full_lines();
        assert!(clear.is_empty());
        assert_eq!(clear.bonus(), 0);
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn test_black_is_a_filled_color() {
        let mut grid = Grid::new(1);
        let black = Shape::new("#".parse().unwrap(), Color::from_rgb(0));
        grid.place(&black, 0, 0).unwrap();
        assert_eq!(grid.occupied_count(), 1);
        assert!(!grid.can_place(&black, 0, 0));
    }

    #[test]
    fn test_manual_clears() {
        let mut grid = Grid::new(3);
        fill_row_except(&mut grid, 0, &[1]);
        fill_row_except(&mut grid, 1, &[]);
        assert_eq!(grid.clear_row(0).unwrap().len(), 2);
        assert_eq!(grid.clear_column(2).unwrap().len(), 1);
        assert_eq!(grid.clear_cell(Position::new(1, 0)).unwrap().len(), 1);
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(
            grid.clear_row(3),
            Err(GridError::LineOutOfBounds { index: 3, size: 3 })
        );
        assert!(grid.clear_cell(Position::new(0, 3)).is_err());

        grid.reset();
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_from_rows_requires_square() {
        assert_eq!(
            Grid::from_rows(&[vec![None, None], vec![None]]),
            Err(GridError::NotSquare {
                row: 1,
                len: 1,
                size: 2
            })
        );
        assert_eq!(
            Grid::from_rows::<Vec<Option<Color>>>(&[]),
            Err(GridError::Empty)
        );
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(3);
        grid.place(&shape("#./##"), 1, 0).unwrap();
        assert_eq!(grid.to_string(), "...\n#..\n##.");
    }

    fn arb_pattern() -> impl Strategy<Value = ShapePatternRows> {
        (1usize..=4, 1usize..=4).prop_flat_map(|(h, w)| {
            prop::collection::vec(prop::collection::vec(any::<bool>(), w), h)
        })
    }

    type ShapePatternRows = Vec<Vec<bool>>;

    fn arb_grid(size: usize) -> impl Strategy<Value = Grid> {
        prop::collection::vec(any::<bool>(), size * size).prop_map(move |filled| {
            let rows: Vec<Vec<Option<Color>>> = filled
                .chunks(size)
                .map(|row| row.iter().map(|f| f.then_some(BLUE)).collect())
                .collect();
            Grid::from_rows(&rows).unwrap()
        })
    }

    proptest! {
        #[test]
        fn can_place_matches_cellwise_definition(
            grid in arb_grid(6),
            rows in arb_pattern(),
            row in -4i32..8,
            col in -4i32..8,
        ) {
            let shape = Shape::new(crate::ShapePattern::from_rows(&rows).unwrap(), RED);
            let expected = shape.pattern().offsets().all(|(dr, dc)| {
                let r = i64::from(row) + i64::try_from(dr).unwrap();
                let c = i64::from(col) + i64::try_from(dc).unwrap();
                (0..6).contains(&r)
                    && (0..6).contains(&c)
                    && grid
                        .cell(Position::new(usize::try_from(r).unwrap(), usize::try_from(c).unwrap()))
                        .is_none()
            });
            prop_assert_eq!(grid.can_place(&shape, row, col), expected);

            let mut placed = grid.clone();
            let result = placed.place(&shape, row, col);
            if expected {
                prop_assert!(result.is_ok());
                prop_assert_eq!(
                    placed.occupied_count(),
                    grid.occupied_count() + shape.pattern().cell_count()
                );
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(&placed, &grid);
            }
        }

        #[test]
        fn clear_leaves_no_full_line(grid in arb_grid(5)) {
            let mut cleared = grid.clone();
            let clear = cleared.clear_full_lines();
            for i in 0..5 {
                prop_assert!(!cleared.is_row_full(i) && !cleared.is_column_full(i));
            }
            prop_assert_eq!(
                cleared.occupied_count() + clear.cleared_cells().len(),
                grid.occupied_count()
            );
            prop_assert_eq!(clear.bonus(), line_clear_bonus(clear.lines_cleared()));
        }
    }
}
