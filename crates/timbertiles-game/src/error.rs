use timbertiles_core::GridError;

use crate::{Phase, PowerupKind};

/// Errors that can occur during game operations.
///
/// Rejections are reported before any state is touched, so a caller can treat
/// every variant as "nothing happened".
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GameError {
    /// The shape does not fit at the requested origin.
    #[display("shape does not fit at row {row}, column {col}")]
    IllegalPlacement {
        /// Requested origin row.
        row: i32,
        /// Requested origin column.
        col: i32,
    },
    /// The tray slot is out of range or already used.
    #[display("tray slot {slot} is empty or out of range")]
    InvalidSlot {
        /// The requested slot.
        slot: usize,
    },
    /// Undo was requested with an empty history.
    #[display("nothing to undo")]
    NothingToUndo,
    /// Redo was requested with nothing undone.
    #[display("nothing to redo")]
    NothingToRedo,
    /// A history entry does not match the live board; it was discarded.
    #[display("history entry has a {found}x{found} grid, expected {expected}x{expected}")]
    CorruptSnapshot {
        /// Side length of the live grid.
        expected: usize,
        /// Side length found in the snapshot.
        found: usize,
    },
    /// The session is not in a phase that accepts this operation.
    #[display("operation not allowed while the session is {phase}")]
    NotPlaying {
        /// Current phase.
        phase: Phase,
    },
    /// The score is too low to pay for a remedy.
    #[display("remedy costs {needed} points but the score is {available}")]
    InsufficientScore {
        /// Cost in points.
        needed: u32,
        /// Current score.
        available: u32,
    },
    /// The coin balance is too low.
    #[display("costs {needed} coins but only {available} are available")]
    InsufficientCoins {
        /// Cost in coins.
        needed: u32,
        /// Current balance.
        available: u32,
    },
    /// No charges of a power-up are left.
    #[display("no {kind} charges left")]
    NoPowerupCharges {
        /// The power-up that was requested.
        kind: PowerupKind,
    },
    /// No puzzle has this id.
    #[display("unknown puzzle {id}")]
    UnknownPuzzle {
        /// The requested id.
        id: usize,
    },
    /// The puzzle belongs to a pack that is still locked.
    #[display("puzzle pack {pack} is locked")]
    PackLocked {
        /// Index of the locked pack.
        pack: usize,
    },
    /// A row, column or cell index lies outside the grid.
    #[display("{_0}")]
    OutOfBounds(GridError),
}

impl From<GridError> for GameError {
    fn from(error: GridError) -> Self {
        match error {
            GridError::IllegalPlacement { row, col } => Self::IllegalPlacement { row, col },
            other => Self::OutOfBounds(other),
        }
    }
}
