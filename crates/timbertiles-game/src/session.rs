use std::{fmt, num::NonZero};

use chrono::{Local, NaiveDate, Utc};
use log::{debug, info, trace, warn};
use rand_pcg::Pcg64;
use timbertiles_core::{Difficulty, Grid, GridError, LineClear, PlacedCell, Position, Theme};
use timbertiles_generator::{DailyChallenge, ShapeSampler, shape_rng};

use crate::{
    Cost, GameError, GameEvent, GameObserver, History, KeyValueStore, MoveRecord, PowerupKind,
    Profile, Puzzle, Remedy, Tray, coins_for_increment, puzzle,
};

/// How a session is played.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant,
)]
pub enum GameMode {
    /// Play until no shape fits.
    #[default]
    #[display("normal")]
    Normal,
    /// Normal play where running out of moves can be bought off.
    #[display("endless")]
    Endless,
    /// The date-seeded board shared by every player on one day.
    #[display("daily")]
    Daily,
    /// Clear the pre-filled cells of a built-in puzzle.
    #[display("puzzle {id}")]
    Puzzle {
        /// Puzzle id.
        id: usize,
    },
}

/// Lifecycle of a session.
///
/// `Setup` becomes `Playing` on [`Session::start`]. `GameOver` and
/// `PuzzleSolved` are final until [`Session::restart`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant,
)]
pub enum Phase {
    /// Created but not started.
    #[default]
    #[display("setting up")]
    Setup,
    /// Accepting placements.
    #[display("playing")]
    Playing,
    /// Endless session with no legal move that can still pay to continue.
    #[display("stuck")]
    Stuck,
    /// Finished.
    #[display("over")]
    GameOver,
    /// Puzzle solved; frozen.
    #[display("solved")]
    PuzzleSolved,
}

/// Everything needed to set up a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Game mode.
    pub mode: GameMode,
    /// Shape catalog tier; also picks the default grid size.
    pub difficulty: Difficulty,
    /// Theme whose palette colors new shapes.
    pub theme: Theme,
    /// Grid side length overriding the difficulty default. Ignored for puzzles,
    /// which bring their own board.
    pub grid_size: Option<usize>,
    /// Seed for ordinary shape draws; random when `None`.
    pub seed: Option<u64>,
    /// Calendar date for daily mode; today when `None`.
    pub date: Option<NaiveDate>,
    /// Maximum undo depth. Unlimited by default.
    pub history_capacity: NonZero<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            theme: Theme::default(),
            grid_size: None,
            seed: None,
            date: None,
            history_capacity: History::default_capacity(),
        }
    }
}

/// What a successful placement did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementReport {
    /// Cells covered by the shape.
    pub placed: Vec<PlacedCell>,
    /// Lines emptied by the placement.
    pub clear: LineClear,
    /// Points earned.
    pub bonus: u32,
    /// Coins earned.
    pub coins_awarded: u32,
    /// Whether the tray was dealt a new set.
    pub refilled: bool,
    /// Phase after the placement.
    pub phase: Phase,
}

/// What a paid removal did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemedyReport {
    /// Cells that were emptied.
    pub cleared: Vec<PlacedCell>,
    /// Price paid.
    pub cost: Cost,
    /// Phase after the removal.
    pub phase: Phase,
}

/// A power-up together with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerupAction {
    /// Empty `row` without paying.
    ClearRow {
        /// Row to empty.
        row: usize,
    },
    /// Replace all three tray slots.
    SwapTray,
    /// Undo the last action.
    ExtraUndo,
}

impl PowerupAction {
    /// Returns the inventory kind this action consumes.
    #[must_use]
    pub fn kind(self) -> PowerupKind {
        match self {
            Self::ClearRow { .. } => PowerupKind::ClearRow,
            Self::SwapTray => PowerupKind::SwapTray,
            Self::ExtraUndo => PowerupKind::ExtraUndo,
        }
    }
}

#[derive(Debug, Clone)]
struct PuzzleState {
    id: usize,
    pack: Option<usize>,
    targets: Vec<Position>,
}

/// One game: board, tray, score and history, plus the player's profile.
///
/// All operations run to completion synchronously. Rejected operations return
/// an error and leave the session exactly as it was.
pub struct Session<S> {
    config: SessionConfig,
    profile: Profile<S>,
    sampler: ShapeSampler,
    rng: Pcg64,
    grid: Grid,
    tray: Tray,
    score: u32,
    phase: Phase,
    history: History,
    puzzle: Option<PuzzleState>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl<S> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("grid", &self.grid)
            .field("tray", &self.tray)
            .field("score", &self.score)
            .field("phase", &self.phase)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl<S> Session<S>
where
    S: KeyValueStore,
{
    /// Creates a session in the [`Phase::Setup`] phase.
    ///
    /// # Errors
    ///
    /// For puzzle mode, returns [`GameError::UnknownPuzzle`] for a bad id and
    /// [`GameError::PackLocked`] if the puzzle's pack is not unlocked yet.
    pub fn new(config: SessionConfig, profile: Profile<S>) -> Result<Self, GameError> {
        let puzzle = match config.mode {
            GameMode::Puzzle { id } => {
                let puzzle = puzzle(id).ok_or(GameError::UnknownPuzzle { id })?;
                let pack = puzzle.pack();
                if let Some(pack) = pack
                    && !profile.is_pack_unlocked(pack)
                {
                    return Err(GameError::PackLocked { pack });
                }
                Some(PuzzleState {
                    id,
                    pack,
                    targets: puzzle.targets(),
                })
            }
            _ => None,
        };

        let grid_size = match config.mode {
            GameMode::Puzzle { id } => puzzle_grid_size(id)?,
            _ => config
                .grid_size
                .filter(|&size| size > 0)
                .unwrap_or(config.difficulty.default_grid_size()),
        };

        Ok(Self {
            sampler: ShapeSampler::new(config.difficulty, config.theme.palette()),
            rng: shape_rng(config.seed),
            grid: Grid::new(grid_size),
            tray: Tray::default(),
            score: 0,
            phase: Phase::Setup,
            history: History::with_capacity(config.history_capacity),
            puzzle,
            observers: Vec::new(),
            config,
            profile,
        })
    }

    /// Registers an observer for every later event.
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Deals the opening board and tray and starts play.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotPlaying`] unless the session is in [`Phase::Setup`].
    pub fn start(&mut self) -> Result<(), GameError> {
        if !self.phase.is_setup() {
            return Err(GameError::NotPlaying { phase: self.phase });
        }

        let size = self.grid.size();
        let (grid, tray) = match self.config.mode {
            GameMode::Normal | GameMode::Endless => (
                Grid::new(size),
                Tray::new(self.sampler.sample_tray(&mut self.rng)),
            ),
            GameMode::Daily => {
                let date = self.config.date.unwrap_or_else(|| Local::now().date_naive());
                let challenge = DailyChallenge::generate(date, &self.sampler, size);
                (challenge.grid, Tray::new(challenge.tray))
            }
            GameMode::Puzzle { id } => {
                let puzzle = puzzle(id).ok_or(GameError::UnknownPuzzle { id })?;
                let shapes = puzzle
                    .tray()
                    .cloned()
                    .unwrap_or_else(|| self.sampler.sample_tray(&mut self.rng));
                (puzzle.grid().clone(), Tray::new(shapes))
            }
        };

        self.grid = grid;
        self.tray = tray;
        self.phase = Phase::Playing;
        self.set_score(0);
        self.history.reset(self.record());
        info!(
            "started {} session ({}, {size}x{size})",
            self.config.mode, self.config.difficulty
        );
        self.emit(GameEvent::TrayRefilled);
        self.settle();
        Ok(())
    }

    /// Abandons the current game and starts a new one with the same settings.
    ///
    /// Daily and puzzle sessions replay the same opening; other modes deal a new
    /// tray.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownPuzzle`] if the puzzle vanished, which cannot
    /// happen with the built-in catalog.
    pub fn restart(&mut self) -> Result<(), GameError> {
        info!("restarting {} session", self.config.mode);
        self.phase = Phase::Setup;
        self.start()
    }

    /// Places the shape in `slot` with its origin at `(row, col)`.
    ///
    /// On success the shape's cells are filled, full lines are cleared and
    /// scored, coins are granted for crossed hundreds, the puzzle goal is
    /// checked, the tray is refilled once all three slots are used, and the
    /// session ends if nothing fits any more.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotPlaying`] outside [`Phase::Playing`]
    /// - [`GameError::InvalidSlot`] for an empty or out-of-range slot
    /// - [`GameError::IllegalPlacement`] if the shape does not fit there
    ///
    /// Nothing changes on error, including the history.
    pub fn attempt_placement(
        &mut self,
        slot: usize,
        row: i32,
        col: i32,
    ) -> Result<PlacementReport, GameError> {
        if !self.phase.is_playing() {
            return Err(GameError::NotPlaying { phase: self.phase });
        }
        let shape = self.tray.get(slot).ok_or(GameError::InvalidSlot { slot })?;
        if !self.grid.can_place(shape, row, col) {
            debug!("rejected slot {slot} at ({row}, {col})");
            return Err(GameError::IllegalPlacement { row, col });
        }

        let shape = self.tray.consume(slot)?;
        let placed = self.grid.place(&shape, row, col)?;
        debug!("placed {} from slot {slot} at ({row}, {col})", shape.pattern());

        let clear = self.grid.clear_full_lines();
        let bonus = clear.bonus();
        let mut coins_awarded = 0;
        if !clear.is_empty() {
            let lines = u64::try_from(clear.lines_cleared()).unwrap_or(u64::MAX);
            debug!(
                "cleared rows {:?} and columns {:?} for {bonus} points",
                clear.cleared_rows(),
                clear.cleared_columns()
            );
            self.profile
                .update_stats(|stats| stats.total_lines = stats.total_lines.saturating_add(lines));
            self.emit(GameEvent::LinesCleared {
                clear: clear.clone(),
                bonus,
            });
            coins_awarded = self.add_score(bonus);
        }

        let mut refilled = false;
        if !self.check_puzzle_completion() {
            refilled = self.tray.refill_if_empty(&self.sampler, &mut self.rng);
            if refilled {
                debug!("tray refilled");
                self.emit(GameEvent::TrayRefilled);
            }
            self.settle();
        }
        self.history.push(self.record());

        Ok(PlacementReport {
            placed,
            clear,
            bonus,
            coins_awarded,
            refilled,
            phase: self.phase,
        })
    }

    /// Returns whether [`Session::attempt_placement`] would succeed, for hover
    /// highlighting.
    #[must_use]
    pub fn can_place_preview(&self, slot: usize, row: i32, col: i32) -> bool {
        self.phase.is_playing()
            && self
                .tray
                .get(slot)
                .is_some_and(|shape| self.grid.can_place(shape, row, col))
    }

    /// Restores the state before the last action. Coins are not returned.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotPlaying`] unless playing or stuck
    /// - [`GameError::NothingToUndo`] at the start of the history
    /// - [`GameError::CorruptSnapshot`] if the entry does not fit this board; the
    ///   entry is dropped and the live state is kept
    pub fn undo(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        let record = match self.history.undo(self.grid.size()) {
            Ok(record) => record.clone(),
            Err(e) => {
                if matches!(e, GameError::CorruptSnapshot { .. }) {
                    warn!("dropped history entry: {e}");
                }
                return Err(e);
            }
        };
        self.restore(record, GameEvent::Undone);
        Ok(())
    }

    /// Re-applies the last undone action.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotPlaying`] unless playing or stuck
    /// - [`GameError::NothingToRedo`] if nothing was undone since the last action
    /// - [`GameError::CorruptSnapshot`] as for [`Session::undo`]
    pub fn redo(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        let record = match self.history.redo(self.grid.size()) {
            Ok(record) => record.clone(),
            Err(e) => {
                if matches!(e, GameError::CorruptSnapshot { .. }) {
                    warn!("dropped history entry: {e}");
                }
                return Err(e);
            }
        };
        self.restore(record, GameEvent::Redone);
        Ok(())
    }

    /// Pays to empty a row, a column or a cell.
    ///
    /// Endless sessions pay with score, other modes with coins; see
    /// [`Remedy::cost`]. Paying with score never takes coins back. Afterwards a
    /// stuck session resumes if a shape fits again.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotPlaying`] unless playing or stuck
    /// - [`GameError::OutOfBounds`] for a target outside the grid
    /// - [`GameError::InsufficientScore`] or [`GameError::InsufficientCoins`]
    pub fn remediate(&mut self, remedy: Remedy) -> Result<RemedyReport, GameError> {
        self.ensure_active()?;
        self.check_target(remedy)?;
        let cost = remedy.cost(self.config.mode);
        self.charge(cost)?;

        let cleared = match remedy {
            Remedy::Row(row) => self.grid.clear_row(row)?,
            Remedy::Column(col) => self.grid.clear_column(col)?,
            Remedy::Cell(pos) => self.grid.clear_cell(pos)?,
        };
        info!("removed {remedy} for {cost}");
        self.settle();
        self.history.push(self.record());

        Ok(RemedyReport {
            cleared,
            cost,
            phase: self.phase,
        })
    }

    /// Buys one power-up charge with coins.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InsufficientCoins`] if the balance is too low.
    pub fn buy_powerup(&mut self, kind: PowerupKind) -> Result<(), GameError> {
        self.profile.buy_powerup(kind)?;
        info!("bought {kind}");
        Ok(())
    }

    /// Spends a power-up charge.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotPlaying`] unless playing or stuck
    /// - [`GameError::NoPowerupCharges`] if the inventory has none
    /// - [`GameError::OutOfBounds`] for a row outside the grid
    /// - any error from [`Session::undo`] for [`PowerupAction::ExtraUndo`]
    ///
    /// No charge is consumed when an error is returned.
    pub fn use_powerup(&mut self, action: PowerupAction) -> Result<(), GameError> {
        self.ensure_active()?;
        let kind = action.kind();
        if self.profile.powerups().count(kind) == 0 {
            return Err(GameError::NoPowerupCharges { kind });
        }

        match action {
            PowerupAction::ClearRow { row } => {
                self.check_target(Remedy::Row(row))?;
                self.grid.clear_row(row)?;
                self.settle();
                self.history.push(self.record());
            }
            PowerupAction::SwapTray => {
                self.tray.replace_all(self.sampler.sample_tray(&mut self.rng));
                self.emit(GameEvent::TrayRefilled);
                self.settle();
                self.history.push(self.record());
            }
            PowerupAction::ExtraUndo => self.undo()?,
        }

        self.profile.take_powerup(kind)?;
        info!("used {kind}");
        Ok(())
    }

    /// Ends a playing or stuck session now.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotPlaying`] in any other phase.
    pub fn give_up(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        self.finish_game();
        Ok(())
    }

    /// Marks the puzzle solved if every originally filled cell is empty.
    ///
    /// Returns `true` only on the call that solves it. Solving records the
    /// puzzle, unlocks the next pack once the current one is complete, updates
    /// statistics and freezes the session.
    pub fn check_puzzle_completion(&mut self) -> bool {
        if !(self.phase.is_playing() || self.phase.is_stuck()) {
            return false;
        }
        let Some(puzzle) = &self.puzzle else {
            return false;
        };
        if puzzle
            .targets
            .iter()
            .any(|&pos| self.grid.get(pos).flatten().is_some())
        {
            return false;
        }

        let (id, pack) = (puzzle.id, puzzle.pack);
        self.phase = Phase::PuzzleSolved;
        info!("puzzle {id} solved with {} points", self.score);
        self.profile.mark_puzzle_completed(id);
        let now = Utc::now();
        self.profile.update_stats(|stats| {
            stats.puzzles_solved = stats.puzzles_solved.saturating_add(1);
            stats.record_play(now);
        });
        self.emit(GameEvent::PuzzleSolved { id });

        if let Some(pack) = pack
            && self.profile.is_pack_completed(pack)
            && self.profile.unlock_pack(pack + 1)
        {
            info!("unlocked puzzle pack {}", pack + 1);
            self.emit(GameEvent::PackUnlocked { pack: pack + 1 });
        }
        true
    }

    /// Installs a saved history, for example when resuming. The live board is
    /// not changed; entries are validated when undo or redo reaches them.
    pub fn replace_history(&mut self, history: History) {
        self.history = history;
    }

    /// Session settings.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Game mode.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    /// Current board.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current tray.
    #[must_use]
    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best recorded score for this mode and difficulty.
    #[must_use]
    pub fn best_score(&self) -> u32 {
        let stats = self.profile.stats();
        if self.config.mode.is_endless() {
            stats.best_score_endless
        } else {
            stats.best_score(self.config.difficulty)
        }
    }

    /// Coin balance.
    #[must_use]
    pub fn coins(&self) -> u32 {
        self.profile.coins()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Undo history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The puzzle being played, in puzzle mode.
    #[must_use]
    pub fn current_puzzle(&self) -> Option<&'static Puzzle> {
        self.puzzle.as_ref().and_then(|state| puzzle(state.id))
    }

    /// Cells that must be emptied to solve the puzzle, in puzzle mode.
    #[must_use]
    pub fn puzzle_targets(&self) -> Option<&[Position]> {
        self.puzzle.as_ref().map(|state| state.targets.as_slice())
    }

    /// Player records.
    #[must_use]
    pub fn profile(&self) -> &Profile<S> {
        &self.profile
    }

    /// Ends the session and hands back the profile.
    #[must_use]
    pub fn into_profile(self) -> Profile<S> {
        self.profile
    }

    fn record(&self) -> MoveRecord {
        MoveRecord {
            grid: self.grid.clone(),
            tray: self.tray.clone(),
            score: self.score,
        }
    }

    fn emit(&mut self, event: GameEvent) {
        trace!("event {event:?}");
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if self.phase.is_playing() || self.phase.is_stuck() {
            Ok(())
        } else {
            Err(GameError::NotPlaying { phase: self.phase })
        }
    }

    fn check_target(&self, remedy: Remedy) -> Result<(), GameError> {
        let size = self.grid.size();
        match remedy {
            Remedy::Row(index) | Remedy::Column(index) if index >= size => {
                Err(GridError::LineOutOfBounds { index, size }.into())
            }
            Remedy::Cell(position) if !self.grid.contains(position) => {
                Err(GridError::CellOutOfBounds { position, size }.into())
            }
            _ => Ok(()),
        }
    }

    fn charge(&mut self, cost: Cost) -> Result<(), GameError> {
        match cost {
            Cost::Score(points) => {
                let remaining =
                    self.score
                        .checked_sub(points)
                        .ok_or(GameError::InsufficientScore {
                            needed: points,
                            available: self.score,
                        })?;
                self.set_score(remaining);
            }
            Cost::Coins(coins) => {
                self.profile.spend_coins(coins)?;
            }
        }
        Ok(())
    }

    fn set_score(&mut self, score: u32) {
        let previous = self.score;
        if previous != score {
            self.score = score;
            self.emit(GameEvent::ScoreChanged { previous, score });
        }
    }

    // Returns the coins granted.
    fn add_score(&mut self, points: u32) -> u32 {
        let previous = self.score;
        self.set_score(previous.saturating_add(points));

        let coins = coins_for_increment(previous, self.score);
        if coins > 0 {
            let balance = self.profile.add_coins(coins);
            self.emit(GameEvent::CoinsAwarded {
                amount: coins,
                balance,
            });
        }

        let (score, endless, difficulty) = (
            self.score,
            self.config.mode.is_endless(),
            self.config.difficulty,
        );
        self.profile.update_stats(|stats| {
            if endless {
                stats.raise_best_endless(score)
            } else {
                stats.raise_best_score(difficulty, score)
            }
        });
        self.profile.raise_high_score(score);
        coins
    }

    fn restore(&mut self, record: MoveRecord, event: GameEvent) {
        let MoveRecord { grid, tray, score } = record;
        self.grid = grid;
        self.tray = tray;
        self.emit(event);
        self.set_score(score);
        self.phase = Phase::Playing;
        self.settle();
    }

    // Re-evaluates the phase after the board or tray changed.
    fn settle(&mut self) {
        if self.check_puzzle_completion() {
            return;
        }
        if self.tray.has_any_legal_move(&self.grid) {
            self.phase = Phase::Playing;
            return;
        }
        if self.config.mode.is_endless() && self.can_buy_way_out() {
            if !self.phase.is_stuck() {
                self.phase = Phase::Stuck;
                info!("no moves left at {} points; stuck", self.score);
                self.emit(GameEvent::Stuck);
            }
        } else {
            self.finish_game();
        }
    }

    fn can_buy_way_out(&self) -> bool {
        let powerups = self.profile.powerups();
        let has_charge = powerups.count(PowerupKind::ClearRow) > 0
            || powerups.count(PowerupKind::SwapTray) > 0;
        let affordable = match Remedy::cheapest_cost(self.config.mode) {
            Cost::Score(points) => self.score >= points,
            Cost::Coins(coins) => self.profile.coins() >= coins,
        };
        affordable || has_charge
    }

    fn finish_game(&mut self) {
        self.phase = Phase::GameOver;
        let (score, endless, difficulty) = (
            self.score,
            self.config.mode.is_endless(),
            self.config.difficulty,
        );
        let now = Utc::now();
        self.profile.update_stats(|stats| {
            if endless {
                stats.total_endless_games = stats.total_endless_games.saturating_add(1);
                stats.raise_best_endless(score);
            } else {
                stats.total_games = stats.total_games.saturating_add(1);
                stats.raise_best_score(difficulty, score);
            }
            stats.record_play(now);
        });
        self.profile.raise_high_score(score);
        info!("{} game over with {score} points", self.config.mode);
        self.emit(GameEvent::GameOver { score });
    }
}

fn puzzle_grid_size(id: usize) -> Result<usize, GameError> {
    puzzle(id)
        .map(|puzzle| puzzle.grid().size())
        .ok_or(GameError::UnknownPuzzle { id })
}
