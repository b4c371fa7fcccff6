use serde::{Deserialize, Serialize};
use timbertiles_core::{Grid, Shape};
use timbertiles_generator::{Draw, ShapeSampler};

use crate::GameError;

/// Number of slots in the tray.
pub const TRAY_SLOTS: usize = 3;

/// The three-slot holding area offering the player's current shapes.
///
/// Used slots stay empty until every slot is empty; only then does
/// [`Tray::refill_if_empty`] deal a fresh set of three.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tray {
    slots: [Option<Shape>; TRAY_SLOTS],
}

impl Tray {
    /// Creates a full tray.
    #[must_use]
    pub fn new(shapes: [Shape; TRAY_SLOTS]) -> Self {
        Self {
            slots: shapes.map(Some),
        }
    }

    /// Returns all slots in order.
    #[must_use]
    pub fn slots(&self) -> &[Option<Shape>; TRAY_SLOTS] {
        &self.slots
    }

    /// Returns the shape in `slot`, or `None` for a used or out-of-range slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Shape> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Number of slots still holding a shape.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if every slot has been used.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Takes the shape out of `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSlot`] if `slot` is out of range or already empty.
    pub fn consume(&mut self, slot: usize) -> Result<Shape, GameError> {
        self.slots
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or(GameError::InvalidSlot { slot })
    }

    /// Deals three new shapes if every slot is empty. Returns whether it did.
    pub fn refill_if_empty<R>(&mut self, sampler: &ShapeSampler, rng: &mut R) -> bool
    where
        R: Draw + ?Sized,
    {
        if !self.is_empty() {
            return false;
        }
        self.replace_all(sampler.sample_tray(rng));
        true
    }

    /// Replaces every slot, used or not.
    pub fn replace_all(&mut self, shapes: [Shape; TRAY_SLOTS]) {
        self.slots = shapes.map(Some);
    }

    /// Returns `true` if any remaining shape has a legal origin on `grid`.
    ///
    /// Only origins whose whole bounding box lies inside the grid are scanned. A
    /// shape taller or wider than the grid never has a legal move.
    #[must_use]
    pub fn has_any_legal_move(&self, grid: &Grid) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|shape| first_legal_origin(grid, shape).is_some())
    }
}

/// Returns the first origin, in row-major order, at which `shape` fits with its
/// whole bounding box inside `grid`.
#[must_use]
pub fn first_legal_origin(grid: &Grid, shape: &Shape) -> Option<(i32, i32)> {
    let size = grid.size();
    let pattern = shape.pattern();
    let rows = size.checked_sub(pattern.height())?;
    let cols = size.checked_sub(pattern.width())?;
    (0..=rows)
        .flat_map(|row| (0..=cols).map(move |col| (row, col)))
        .filter_map(|(row, col)| Some((i32::try_from(row).ok()?, i32::try_from(col).ok()?)))
        .find(|&(row, col)| grid.can_place(shape, row, col))
}
