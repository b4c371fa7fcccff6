//! Persisted player records.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use timbertiles_core::Difficulty;

use crate::{GameError, KeyValueStore, POWERUP_PRICE, PUZZLE_PACKS, PowerupInventory, PowerupKind};

/// Key of the legacy single high score.
pub const HIGH_SCORE_KEY: &str = "timbertiles_highscore";
/// Key of the [`Stats`] record.
pub const STATS_KEY: &str = "timbertiles_stats";
/// Key of the coin balance.
pub const COINS_KEY: &str = "timbertiles_coins";
/// Key of the [`PowerupInventory`].
pub const POWERUPS_KEY: &str = "timbertiles_powerups";
/// Key of the completed puzzle id list.
pub const PUZZLES_COMPLETED_KEY: &str = "blockwood_puzzles_completed";
/// Key of the unlocked pack flags.
pub const PUZZLE_UNLOCKS_KEY: &str = "blockwood_puzzle_unlocks";

const KEY_PREFIX: &str = "timbertiles_";

/// Lifetime statistics, stored as one JSON object with camel-case keys.
///
/// Missing keys read as their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    /// Best score in an easy normal, daily or puzzle game.
    pub best_score_easy: u32,
    /// Best score in a difficult normal, daily or puzzle game.
    pub best_score_difficult: u32,
    /// Best endless score.
    pub best_score_endless: u32,
    /// Finished non-endless games.
    pub total_games: u32,
    /// Finished endless games.
    pub total_endless_games: u32,
    /// Lines cleared across all games.
    pub total_lines: u64,
    /// Puzzles solved, counting repeats.
    pub puzzles_solved: u32,
    /// Longest run of consecutive days with a finished game.
    pub longest_streak: u32,
    /// Current run of consecutive days with a finished game.
    pub current_streak: u32,
    /// When the last game finished.
    pub last_played: Option<DateTime<Utc>>,
}

impl Stats {
    /// Best score for a non-endless game on `difficulty`.
    #[must_use]
    pub fn best_score(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.best_score_easy,
            Difficulty::Difficult => self.best_score_difficult,
        }
    }

    /// Raises the best score for `difficulty` to `score`. Returns whether it grew.
    pub fn raise_best_score(&mut self, difficulty: Difficulty, score: u32) -> bool {
        let best = match difficulty {
            Difficulty::Easy => &mut self.best_score_easy,
            Difficulty::Difficult => &mut self.best_score_difficult,
        };
        raise(best, score)
    }

    /// Raises the endless best score to `score`. Returns whether it grew.
    pub fn raise_best_endless(&mut self, score: u32) -> bool {
        raise(&mut self.best_score_endless, score)
    }

    /// Stamps a finished game at `now` and advances the daily streak.
    ///
    /// A game on the calendar day after the previous one extends the streak, a
    /// second game on the same day leaves it alone, and anything else starts a
    /// new streak of one.
    pub fn record_play(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        let last_day = self.last_played.map(|t| t.date_naive());
        self.current_streak = match last_day {
            Some(day) if day == today => self.current_streak.max(1),
            Some(day) if day.succ_opt() == Some(today) => self.current_streak.saturating_add(1),
            _ => 1,
        };
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_played = Some(now);
    }
}

fn raise(best: &mut u32, score: u32) -> bool {
    if score > *best {
        *best = score;
        true
    } else {
        false
    }
}

/// Typed access to player records in a [`KeyValueStore`].
///
/// Every read falls back to defaults when a value is missing or unreadable, so
/// a corrupt store never stops the game; unreadable values are logged.
#[derive(Debug, Clone, Default)]
pub struct Profile<S> {
    store: S,
}

impl<S> Profile<S>
where
    S: KeyValueStore,
{
    /// Wraps a store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwraps the underlying store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn read<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let Some(text) = self.store.get(key) else {
            return T::default();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("ignoring unreadable value for {key}: {e}");
            T::default()
        })
    }

    fn write<T>(&mut self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_string(value) {
            Ok(text) => self.store.set(key, text),
            Err(e) => warn!("failed to encode value for {key}: {e}"),
        }
    }

    /// Legacy single high score.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.read(HIGH_SCORE_KEY)
    }

    /// Raises the legacy high score to `score` if it is higher.
    pub fn raise_high_score(&mut self, score: u32) {
        if score > self.high_score() {
            self.write(HIGH_SCORE_KEY, &score);
        }
    }

    /// Reads the statistics record.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.read(STATS_KEY)
    }

    /// Writes the statistics record.
    pub fn save_stats(&mut self, stats: &Stats) {
        self.write(STATS_KEY, stats);
    }

    /// Reads, modifies and writes back the statistics record.
    pub fn update_stats<R>(&mut self, f: impl FnOnce(&mut Stats) -> R) -> R {
        let mut stats = self.stats();
        let result = f(&mut stats);
        self.save_stats(&stats);
        result
    }

    /// Coin balance.
    #[must_use]
    pub fn coins(&self) -> u32 {
        self.read(COINS_KEY)
    }

    /// Adds coins and returns the new balance.
    pub fn add_coins(&mut self, amount: u32) -> u32 {
        let balance = self.coins().saturating_add(amount);
        self.write(COINS_KEY, &balance);
        balance
    }

    /// Removes coins and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InsufficientCoins`] and leaves the balance unchanged
    /// if it is below `amount`.
    pub fn spend_coins(&mut self, amount: u32) -> Result<u32, GameError> {
        let available = self.coins();
        let balance = available
            .checked_sub(amount)
            .ok_or(GameError::InsufficientCoins {
                needed: amount,
                available,
            })?;
        self.write(COINS_KEY, &balance);
        Ok(balance)
    }

    /// Power-up charges.
    #[must_use]
    pub fn powerups(&self) -> PowerupInventory {
        self.read(POWERUPS_KEY)
    }

    /// Adds charges of `kind`.
    pub fn add_powerup(&mut self, kind: PowerupKind, count: u32) {
        let mut inventory = self.powerups();
        inventory.add(kind, count);
        self.write(POWERUPS_KEY, &inventory);
    }

    /// Consumes one charge of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoPowerupCharges`] if none are left.
    pub fn take_powerup(&mut self, kind: PowerupKind) -> Result<(), GameError> {
        let mut inventory = self.powerups();
        if !inventory.take(kind) {
            return Err(GameError::NoPowerupCharges { kind });
        }
        self.write(POWERUPS_KEY, &inventory);
        Ok(())
    }

    /// Buys one charge of `kind` for [`POWERUP_PRICE`] coins.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InsufficientCoins`] if the balance is too low.
    pub fn buy_powerup(&mut self, kind: PowerupKind) -> Result<(), GameError> {
        self.spend_coins(POWERUP_PRICE)?;
        self.add_powerup(kind, 1);
        Ok(())
    }

    /// Zeroes every power-up and the coin balance.
    pub fn reset_powerups(&mut self) {
        self.write(POWERUPS_KEY, &PowerupInventory::default());
        self.write(COINS_KEY, &0u32);
    }

    /// Ids of solved puzzles in the order they were first solved.
    #[must_use]
    pub fn completed_puzzles(&self) -> Vec<usize> {
        self.read(PUZZLES_COMPLETED_KEY)
    }

    /// Records `id` as solved. Returns `false` if it already was.
    pub fn mark_puzzle_completed(&mut self, id: usize) -> bool {
        let mut completed = self.completed_puzzles();
        if completed.contains(&id) {
            return false;
        }
        completed.push(id);
        self.write(PUZZLES_COMPLETED_KEY, &completed);
        true
    }

    /// Returns `true` if every puzzle of pack `pack` is solved.
    #[must_use]
    pub fn is_pack_completed(&self, pack: usize) -> bool {
        let completed = self.completed_puzzles();
        PUZZLE_PACKS
            .get(pack)
            .is_some_and(|pack| pack.puzzles.iter().all(|id| completed.contains(id)))
    }

    /// Unlock flag for every pack, index-aligned with [`PUZZLE_PACKS`].
    ///
    /// Missing entries take the pack's default.
    #[must_use]
    pub fn unlocked_packs(&self) -> Vec<bool> {
        let stored: Option<Vec<bool>> = self.read(PUZZLE_UNLOCKS_KEY);
        let stored = stored.unwrap_or_default();
        PUZZLE_PACKS
            .iter()
            .enumerate()
            .map(|(i, pack)| stored.get(i).copied().unwrap_or(pack.unlocked_by_default))
            .collect()
    }

    /// Returns `true` if pack `pack` can be played.
    #[must_use]
    pub fn is_pack_unlocked(&self, pack: usize) -> bool {
        self.unlocked_packs().get(pack).copied().unwrap_or(false)
    }

    /// Unlocks pack `pack`. Returns `false` if it was already open or does not exist.
    pub fn unlock_pack(&mut self, pack: usize) -> bool {
        let mut unlocked = self.unlocked_packs();
        match unlocked.get_mut(pack) {
            Some(flag) if !*flag => {
                *flag = true;
                self.write(PUZZLE_UNLOCKS_KEY, &unlocked);
                true
            }
            _ => false,
        }
    }

    /// Forgets solved puzzles and locks every pack except the first.
    pub fn reset_puzzle_progress(&mut self) {
        self.write(PUZZLES_COMPLETED_KEY, &Vec::<usize>::new());
        let unlocked: Vec<bool> = (0..PUZZLE_PACKS.len()).map(|i| i == 0).collect();
        self.write(PUZZLE_UNLOCKS_KEY, &unlocked);
    }

    /// Removes every `timbertiles_` key. Puzzle progress is kept.
    pub fn clear_all(&mut self) {
        for key in self.store.keys() {
            if key.starts_with(KEY_PREFIX) {
                self.store.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::MemoryStore;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn profile() -> Profile<MemoryStore> {
        Profile::new(MemoryStore::default())
    }

    #[test]
    fn test_missing_values_read_as_defaults() {
        let profile = profile();
        assert_eq!(profile.high_score(), 0);
        assert_eq!(profile.coins(), 0);
        assert_eq!(profile.stats(), Stats::default());
        assert_eq!(profile.powerups(), PowerupInventory::default());
        assert!(profile.completed_puzzles().is_empty());
        assert_eq!(profile.unlocked_packs(), vec![true, false, false]);
    }

    #[test]
    fn test_corrupt_values_fall_back_to_defaults() {
        let profile = Profile::new(MemoryStore::from_entries([
            (STATS_KEY, "{not json"),
            (COINS_KEY, "\"many\""),
            (PUZZLE_UNLOCKS_KEY, "42"),
        ]));
        assert_eq!(profile.stats(), Stats::default());
        assert_eq!(profile.coins(), 0);
        assert_eq!(profile.unlocked_packs(), vec![true, false, false]);
    }

    #[test]
    fn test_partial_stats_merge_with_defaults() {
        let profile = Profile::new(MemoryStore::from_entries([(
            STATS_KEY,
            r#"{"bestScoreEasy":120,"totalLines":7,"lastPlayed":"2024-05-01T10:00:00.000Z","theme":"x"}"#,
        )]));
        let stats = profile.stats();
        assert_eq!(stats.best_score_easy, 120);
        assert_eq!(stats.total_lines, 7);
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.last_played, Some(at(2024, 5, 1, 10)));
    }

    #[test]
    fn test_stats_are_written_with_camel_case_keys() {
        let mut profile = profile();
        profile.update_stats(|stats| stats.total_endless_games = 3);
        let text = profile.store().get(STATS_KEY).unwrap();
        assert!(text.contains("\"totalEndlessGames\":3"), "{text}");
        assert!(text.contains("\"lastPlayed\":null"), "{text}");
    }

    #[test]
    fn test_coins_spend_and_add() {
        let mut profile = profile();
        assert_eq!(profile.add_coins(7), 7);
        assert_eq!(profile.spend_coins(5), Ok(2));
        assert_eq!(
            profile.spend_coins(5),
            Err(GameError::InsufficientCoins {
                needed: 5,
                available: 2
            })
        );
        assert_eq!(profile.coins(), 2);
    }

    #[test]
    fn test_buy_powerup_costs_five_coins() {
        let mut profile = profile();
        profile.add_coins(6);
        profile.buy_powerup(PowerupKind::SwapTray).unwrap();
        assert_eq!(profile.coins(), 1);
        assert_eq!(profile.powerups().count(PowerupKind::SwapTray), 1);
        assert!(profile.buy_powerup(PowerupKind::SwapTray).is_err());
        assert_eq!(profile.powerups().count(PowerupKind::SwapTray), 1);

        profile.take_powerup(PowerupKind::SwapTray).unwrap();
        assert_eq!(
            profile.take_powerup(PowerupKind::SwapTray),
            Err(GameError::NoPowerupCharges {
                kind: PowerupKind::SwapTray
            })
        );
    }

    #[test]
    fn test_powerups_strip_unknown_keys_on_save() {
        let mut profile = Profile::new(MemoryStore::from_entries([(
            POWERUPS_KEY,
            r#"{"CLEAR_ROW":1,"clear_row":4,"BOMB":2}"#,
        )]));
        profile.add_powerup(PowerupKind::ExtraUndo, 1);
        assert_eq!(
            profile.store().get(POWERUPS_KEY).unwrap(),
            r#"{"CLEAR_ROW":1,"SWAP_TRAY":0,"EXTRA_UNDO":1}"#
        );
    }

    #[test]
    fn test_puzzle_progress_and_pack_unlock() {
        let mut profile = profile();
        assert!(profile.mark_puzzle_completed(0));
        assert!(!profile.mark_puzzle_completed(0));
        profile.mark_puzzle_completed(1);
        assert!(!profile.is_pack_completed(0));
        profile.mark_puzzle_completed(2);
        assert!(profile.is_pack_completed(0));

        assert!(profile.unlock_pack(1));
        assert!(!profile.unlock_pack(1));
        assert!(!profile.unlock_pack(7));
        assert!(profile.is_pack_unlocked(1));

        profile.reset_puzzle_progress();
        assert!(profile.completed_puzzles().is_empty());
        assert_eq!(profile.unlocked_packs(), vec![true, false, false]);
    }

    #[test]
    fn test_clear_all_removes_only_prefixed_keys() {
        let mut profile = profile();
        profile.add_coins(3);
        profile.raise_high_score(40);
        profile.mark_puzzle_completed(1);
        profile.clear_all();
        assert_eq!(profile.coins(), 0);
        assert_eq!(profile.high_score(), 0);
        assert_eq!(profile.completed_puzzles(), vec![1]);
    }

    #[test]
    fn test_streak_rules() {
        let mut stats = Stats::default();
        stats.record_play(at(2024, 3, 1, 9));
        assert_eq!(stats.current_streak, 1);
        stats.record_play(at(2024, 3, 1, 22));
        assert_eq!(stats.current_streak, 1);
        stats.record_play(at(2024, 3, 2, 8));
        stats.record_play(at(2024, 3, 3, 8));
        assert_eq!(stats.current_streak, 3);
        stats.record_play(at(2024, 3, 6, 8));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.last_played, Some(at(2024, 3, 6, 8)));
    }

    #[test]
    fn test_best_scores_only_rise() {
        let mut stats = Stats::default();
        assert!(stats.raise_best_score(Difficulty::Difficult, 30));
        assert!(!stats.raise_best_score(Difficulty::Difficult, 20));
        assert_eq!(stats.best_score(Difficulty::Difficult), 30);
        assert_eq!(stats.best_score(Difficulty::Easy), 0);
        assert!(stats.raise_best_endless(5));
    }
}
