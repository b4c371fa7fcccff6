//! Core data types for TimberTiles.
//!
//! This crate holds the pieces of the game that are pure data and pure rules:
//!
//! - [`Color`], [`Theme`] and [`Palette`] - the opaque tokens written into grid cells
//! - [`ShapePattern`] and [`Shape`] - validated polyomino masks and colored pieces
//! - [`Difficulty`] and the shape catalog for each tier
//! - [`Grid`] - the square occupancy matrix with placement and line-clear rules
//!
//! Higher-level orchestration (tray, history, scoring, persistence) lives in
//! `timbertiles-game`.
//!
//! # Example
//!
//! ```
//! use timbertiles_core::{Color, Grid, Shape};
//!
//! let mut grid = Grid::new(4);
//! let bar: Shape = Shape::new("####".parse().unwrap(), Color::from_rgb(0xff6b6b));
//!
//! assert!(grid.can_place(&bar, 0, 0));
//! grid.place(&bar, 0, 0).unwrap();
//!
//! let clear = grid.clear_full_lines();
//! assert_eq!(clear.cleared_rows(), &[0]);
//! assert_eq!(clear.bonus(), 10);
//! assert_eq!(grid.occupied_count(), 0);
//! ```

pub use self::{catalog::*, color::*, grid::*, position::*, shape::*};

mod catalog;
mod color;
mod grid;
mod position;
mod shape;
