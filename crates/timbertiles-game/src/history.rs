use std::{collections::VecDeque, num::NonZero};

use serde::{Deserialize, Serialize};
use timbertiles_core::Grid;

use crate::{GameError, Tray};

/// Everything undo restores: the board, the tray and the score.
///
/// Coins are deliberately absent; they are never handed back by undo or redo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Board contents.
    pub grid: Grid,
    /// Tray contents.
    pub tray: Tray,
    /// Session score.
    pub score: u32,
}

impl MoveRecord {
    /// Checks that this record can replace a live board of side `grid_size`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CorruptSnapshot`] if the grid sizes differ.
    pub fn validate(&self, grid_size: usize) -> Result<(), GameError> {
        if self.grid.size() == grid_size {
            Ok(())
        } else {
            Err(GameError::CorruptSnapshot {
                expected: grid_size,
                found: self.grid.size(),
            })
        }
    }
}

/// A bounded list of states with a cursor marking the live one.
///
/// Entries before the cursor can be undone to, entries after it redone to.
/// Pushing discards everything after the cursor. When full, the oldest entry is
/// dropped.
#[derive(Debug, Clone)]
pub(crate) struct UndoRedoStack<T> {
    stack: VecDeque<T>,
    capacity: NonZero<usize>,
    cursor: usize,
}

impl<T> UndoRedoStack<T> {
    #[must_use]
    pub(crate) fn new(capacity: NonZero<usize>) -> Self {
        Self {
            stack: VecDeque::new(),
            capacity,
            cursor: 0,
        }
    }

    pub(crate) fn push(&mut self, item: T) {
        if self.stack.is_empty() {
            self.stack.push_back(item);
            self.cursor = 0;
            return;
        }

        self.stack.truncate(self.cursor + 1);

        if self.stack.len() == self.capacity.get() {
            self.stack.pop_front();
            self.cursor = self.cursor.saturating_sub(1);
        }

        self.stack.push_back(item);
        self.cursor = self.stack.len() - 1;
    }

    #[must_use]
    pub(crate) fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub(crate) fn can_redo(&self) -> bool {
        self.cursor + 1 < self.stack.len()
    }

    /// Entry an undo would move to.
    #[must_use]
    pub(crate) fn previous(&self) -> Option<&T> {
        self.cursor.checked_sub(1).and_then(|i| self.stack.get(i))
    }

    /// Entry a redo would move to.
    #[must_use]
    pub(crate) fn next(&self) -> Option<&T> {
        self.stack.get(self.cursor + 1)
    }

    pub(crate) fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Drops the entry an undo would move to. The live entry keeps its place.
    pub(crate) fn remove_previous(&mut self) -> Option<T> {
        let index = self.cursor.checked_sub(1)?;
        let removed = self.stack.remove(index)?;
        self.cursor = index;
        Some(removed)
    }

    /// Drops the entry a redo would move to.
    pub(crate) fn remove_next(&mut self) -> Option<T> {
        self.stack.remove(self.cursor + 1)
    }

    pub(crate) fn clear(&mut self) {
        self.stack.clear();
        self.cursor = 0;
    }

    #[must_use]
    pub(crate) fn current(&self) -> Option<&T> {
        self.stack.get(self.cursor)
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub(crate) fn capacity(&self) -> NonZero<usize> {
        self.capacity
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &T> {
        self.stack.iter()
    }

    pub(crate) fn restore_from_parts(&mut self, mut stack: VecDeque<T>, cursor: usize) {
        let overflow = stack.len().saturating_sub(self.capacity.get());
        stack.drain(..overflow);
        self.stack = stack;
        self.cursor = cursor
            .saturating_sub(overflow)
            .min(self.stack.len().saturating_sub(1));
    }
}

/// Undo/redo history of [`MoveRecord`]s for one session.
///
/// The entry under the cursor always describes the live state; it is pushed
/// after every action that changes the board, the tray or the score.
#[derive(Debug, Clone)]
pub struct History {
    stack: UndoRedoStack<MoveRecord>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Default number of entries kept: no limit within a session.
    #[must_use]
    pub const fn default_capacity() -> NonZero<usize> {
        NonZero::<usize>::MAX
    }

    /// Creates an empty history with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::default_capacity())
    }

    /// Creates an empty history keeping at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: NonZero<usize>) -> Self {
        Self {
            stack: UndoRedoStack::new(capacity),
        }
    }

    /// Rebuilds a history from saved entries, clamping the cursor into range.
    ///
    /// Entries are not validated here; a bad entry is reported when undo or redo
    /// reaches it.
    #[must_use]
    pub fn from_parts(capacity: NonZero<usize>, entries: Vec<MoveRecord>, cursor: usize) -> Self {
        let mut stack = UndoRedoStack::new(capacity);
        stack.restore_from_parts(VecDeque::from(entries), cursor);
        Self { stack }
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub fn capacity(&self) -> NonZero<usize> {
        self.stack.capacity()
    }

    /// Index of the live entry.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.stack.cursor()
    }

    /// Number of stored entries, including the live one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.len() == 0
    }

    /// Iterates over all entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &MoveRecord> {
        self.stack.entries()
    }

    /// The entry describing the live state.
    #[must_use]
    pub fn current(&self) -> Option<&MoveRecord> {
        self.stack.current()
    }

    /// Forgets everything and records `initial` as the live state.
    pub fn reset(&mut self, initial: MoveRecord) {
        self.stack.clear();
        self.stack.push(initial);
    }

    /// Records the state after an action. Anything that could be redone is lost.
    pub fn push(&mut self, record: MoveRecord) {
        self.stack.push(record);
    }

    /// Returns `true` if there is an earlier state.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.stack.can_undo()
    }

    /// Returns `true` if there is an undone state to return to.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.stack.can_redo()
    }

    /// Steps back and returns the state to restore.
    ///
    /// The target is checked against `grid_size` first. A target that fails the
    /// check is removed from the history and the cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NothingToUndo`] at the oldest entry and
    /// [`GameError::CorruptSnapshot`] for a target that fails validation.
    pub fn undo(&mut self, grid_size: usize) -> Result<&MoveRecord, GameError> {
        let target = self.stack.previous().ok_or(GameError::NothingToUndo)?;
        if let Err(e) = target.validate(grid_size) {
            self.stack.remove_previous();
            return Err(e);
        }
        self.stack.undo();
        self.stack.current().ok_or(GameError::NothingToUndo)
    }

    /// Steps forward and returns the state to restore.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NothingToRedo`] at the newest entry and
    /// [`GameError::CorruptSnapshot`] for a target that fails validation; the
    /// bad target is removed.
    pub fn redo(&mut self, grid_size: usize) -> Result<&MoveRecord, GameError> {
        let target = self.stack.next().ok_or(GameError::NothingToRedo)?;
        if let Err(e) = target.validate(grid_size) {
            self.stack.remove_next();
            return Err(e);
        }
        self.stack.redo();
        self.stack.current().ok_or(GameError::NothingToRedo)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use super::*;

    fn record(score: u32) -> MoveRecord {
        MoveRecord {
            grid: Grid::new(4),
            tray: Tray::default(),
            score,
        }
    }

    fn corrupt(score: u32) -> MoveRecord {
        MoveRecord {
            grid: Grid::new(7),
            tray: Tray::default(),
            score,
        }
    }

    #[test]
    fn undo_redo_roundtrip() {
        let mut stack = UndoRedoStack::new(NonZero::new(10).unwrap());
        stack.push(1);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.current(), Some(&3));
        assert!(stack.undo());
        assert!(stack.undo());
        assert_eq!(stack.current(), Some(&1));
        assert!(!stack.undo());
        assert!(stack.redo());
        assert_eq!(stack.current(), Some(&2));
        assert_eq!(stack.previous(), Some(&1));
        assert_eq!(stack.next(), Some(&3));
    }

    #[test]
    fn redo_clears_after_push() {
        let mut stack = UndoRedoStack::new(NonZero::new(10).unwrap());
        stack.push(1);
        stack.push(2);
        stack.push(3);

        assert!(stack.undo());
        stack.push(4);

        assert!(!stack.redo());
        assert!(stack.undo());
        assert_eq!(stack.current(), Some(&2));
    }

    #[test]
    fn capacity_drops_oldest_and_adjusts_cursor() {
        let mut stack = UndoRedoStack::new(NonZero::new(3).unwrap());
        for i in 1..=4 {
            stack.push(i);
        }

        assert_eq!(stack.current(), Some(&4));
        assert!(stack.undo());
        assert!(stack.undo());
        assert_eq!(stack.current(), Some(&2));
        assert!(!stack.undo());
    }

    #[test]
    fn remove_keeps_live_entry_under_cursor() {
        let mut stack = UndoRedoStack::new(NonZero::new(10).unwrap());
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert!(stack.undo());

        assert_eq!(stack.remove_previous(), Some(1));
        assert_eq!(stack.current(), Some(&2));
        assert_eq!(stack.remove_next(), Some(3));
        assert_eq!(stack.current(), Some(&2));
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn restore_trims_overflow() {
        let mut stack = UndoRedoStack::new(NonZero::new(2).unwrap());
        stack.restore_from_parts(VecDeque::from(vec![1, 2, 3, 4]), 2);
        assert_eq!(stack.entries().copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(stack.current(), Some(&3));
    }

    #[test]
    fn test_history_undo_and_redo_return_targets() {
        let mut history = History::new();
        history.reset(record(0));
        history.push(record(10));
        history.push(record(35));

        assert_eq!(history.undo(4).unwrap().score, 10);
        assert_eq!(history.undo(4).unwrap().score, 0);
        assert_eq!(history.undo(4), Err(GameError::NothingToUndo));
        assert_eq!(history.redo(4).unwrap().score, 10);

        history.push(record(20));
        assert_eq!(history.redo(4), Err(GameError::NothingToRedo));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_default_history_keeps_every_move() {
        let mut history = History::new();
        history.reset(record(0));
        for score in 1..=6000 {
            history.push(record(score));
        }
        assert_eq!(history.len(), 6001);
        for _ in 0..6000 {
            history.undo(4).unwrap();
        }
        assert_eq!(history.current().unwrap().score, 0);
        assert_eq!(history.undo(4), Err(GameError::NothingToUndo));
    }

    #[test]
    fn test_corrupt_undo_target_is_discarded() {
        let mut history = History::from_parts(
            History::default_capacity(),
            vec![record(0), corrupt(5), record(10)],
            2,
        );

        assert_eq!(
            history.undo(4),
            Err(GameError::CorruptSnapshot {
                expected: 4,
                found: 7
            })
        );
        assert_eq!(history.current().unwrap().score, 10);
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(4).unwrap().score, 0);
    }

    #[test]
    fn test_corrupt_redo_target_is_discarded() {
        let mut history =
            History::from_parts(History::default_capacity(), vec![record(0), corrupt(5)], 0);
        assert!(history.redo(4).unwrap_err() == GameError::CorruptSnapshot {
            expected: 4,
            found: 7
        });
        assert!(!history.can_redo());
        assert_eq!(history.current().unwrap().score, 0);
    }
}
