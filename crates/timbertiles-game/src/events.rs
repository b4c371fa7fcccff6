use timbertiles_core::LineClear;

/// Something that happened in a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// The score changed.
    ScoreChanged {
        /// Score before the change.
        previous: u32,
        /// Score after the change.
        score: u32,
    },
    /// Coins were granted for crossing score thresholds.
    CoinsAwarded {
        /// Coins granted by this change.
        amount: u32,
        /// Balance after the grant.
        balance: u32,
    },
    /// Full rows and columns were emptied after a placement.
    LinesCleared {
        /// Rows and columns that were cleared.
        clear: LineClear,
        /// Points awarded.
        bonus: u32,
    },
    /// Three new shapes were dealt into the tray.
    TrayRefilled,
    /// An endless session ran out of moves but can still pay to continue.
    Stuck,
    /// The session ended.
    GameOver {
        /// Final score.
        score: u32,
    },
    /// Every originally filled cell of the puzzle is empty.
    PuzzleSolved {
        /// Id of the solved puzzle.
        id: usize,
    },
    /// A puzzle pack became available.
    PackUnlocked {
        /// Index of the unlocked pack.
        pack: usize,
    },
    /// The previous state was restored.
    Undone,
    /// An undone state was restored.
    Redone,
}

/// Receives [`GameEvent`]s from a session.
///
/// Any `FnMut(&GameEvent)` closure is an observer.
pub trait GameObserver {
    /// Called once per event, in the order events happen.
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameObserver for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event);
    }
}
