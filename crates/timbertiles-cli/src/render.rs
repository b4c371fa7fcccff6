use std::fmt::{self, Display};

use timbertiles_core::{Position, Shape};
use timbertiles_game::{
    GameEvent, KeyValueStore, PUZZLE_PACKS, PowerupKind, Profile, Session, TRAY_SLOTS, puzzle,
};

/// Board, tray and counters, as printed after every command.
pub(crate) struct SessionView<'a, S>(pub(crate) &'a Session<S>);

impl<S> Display for SessionView<'_, S>
where
    S: KeyValueStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        let grid = session.grid();
        let targets = session.puzzle_targets().unwrap_or_default();

        f.write_str("   ")?;
        for col in 0..grid.size() {
            write!(f, " {}", col % 10)?;
        }
        writeln!(f)?;
        for (row, cells) in grid.rows().enumerate() {
            write!(f, "{row:>3}")?;
            for (col, cell) in cells.iter().enumerate() {
                let mark = match cell {
                    Some(_) if targets.contains(&Position::new(row, col)) => '@',
                    Some(_) => '#',
                    None => '.',
                };
                write!(f, " {mark}")?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        write!(f, "{}", TrayView(session.tray().slots()))?;
        writeln!(
            f,
            "score {}  best {}  coins {}  [{}]",
            session.score(),
            session.best_score(),
            session.coins(),
            session.phase()
        )
    }
}

/// Tray slots side by side, each under its index.
struct TrayView<'a>(&'a [Option<Shape>; TRAY_SLOTS]);

impl Display for TrayView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<Vec<String>> = self
            .0
            .iter()
            .map(|slot| match slot {
                Some(shape) => shape
                    .pattern()
                    .rows()
                    .map(|row| {
                        row.iter()
                            .map(|&filled| if filled { '#' } else { ' ' })
                            .collect()
                    })
                    .collect(),
                None => vec!["-".to_owned()],
            })
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .map(|lines| lines.iter().map(String::len).max().unwrap_or(0).max(3))
            .collect();
        let height = columns.iter().map(Vec::len).max().unwrap_or(0);

        let header: String = widths
            .iter()
            .enumerate()
            .map(|(slot, &width)| format!("  {:<width$}", format!("[{slot}]")))
            .collect();
        writeln!(f, "{}", header.trim_end())?;
        for line in 0..height {
            let text: String = columns
                .iter()
                .zip(&widths)
                .map(|(lines, &width)| {
                    let cell = lines.get(line).map_or("", String::as_str);
                    format!("  {cell:<width$}")
                })
                .collect();
            writeln!(f, "{}", text.trim_end())?;
        }
        Ok(())
    }
}

/// Lifetime statistics, coins and power-up charges.
pub(crate) struct StatsView<'a, S>(pub(crate) &'a Profile<S>);

impl<S> Display for StatsView<'_, S>
where
    S: KeyValueStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.0;
        let stats = profile.stats();
        let powerups = profile.powerups();
        writeln!(f, "best easy       {}", stats.best_score_easy)?;
        writeln!(f, "best difficult  {}", stats.best_score_difficult)?;
        writeln!(f, "best endless    {}", stats.best_score_endless)?;
        writeln!(f, "games           {}", stats.total_games)?;
        writeln!(f, "endless games   {}", stats.total_endless_games)?;
        writeln!(f, "lines cleared   {}", stats.total_lines)?;
        writeln!(f, "puzzles solved  {}", stats.puzzles_solved)?;
        writeln!(
            f,
            "streak          {} (longest {})",
            stats.current_streak, stats.longest_streak
        )?;
        if let Some(last) = stats.last_played {
            writeln!(f, "last played     {}", last.to_rfc3339())?;
        }
        writeln!(f, "coins           {}", profile.coins())?;
        for kind in PowerupKind::ALL {
            writeln!(f, "{:<16}{}", kind.to_string(), powerups.count(kind))?;
        }
        Ok(())
    }
}

/// Puzzle packs with their lock state and completed puzzles.
pub(crate) struct PuzzlesView<'a, S>(pub(crate) &'a Profile<S>);

impl<S> Display for PuzzlesView<'_, S>
where
    S: KeyValueStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.0;
        let completed = profile.completed_puzzles();
        for (index, pack) in PUZZLE_PACKS.iter().enumerate() {
            let lock = if profile.is_pack_unlocked(index) {
                ""
            } else {
                " (locked)"
            };
            writeln!(f, "{}{lock}", pack.name)?;
            for id in pack.puzzles {
                let Some(puzzle) = puzzle(id) else { continue };
                let mark = if completed.contains(&id) { 'x' } else { ' ' };
                writeln!(f, "  [{mark}] {id}: {}", puzzle.goal())?;
            }
        }
        Ok(())
    }
}

/// One line of feedback for events the board view does not show.
pub(crate) fn describe_event(event: &GameEvent) -> Option<String> {
    let line = match event {
        GameEvent::LinesCleared { clear, bonus } => {
            let lines = clear.lines_cleared();
            let noun = if lines == 1 { "line" } else { "lines" };
            format!("cleared {lines} {noun} for {bonus} points")
        }
        GameEvent::CoinsAwarded { amount, balance } => {
            format!("+{amount} coin(s), balance {balance}")
        }
        GameEvent::Stuck => {
            "no shape fits; pay to remove a line or cell, use a power-up, or give up".to_owned()
        }
        GameEvent::GameOver { score } => format!("game over with {score} points"),
        GameEvent::PuzzleSolved { id } => format!("puzzle {id} solved!"),
        GameEvent::PackUnlocked { pack } => {
            let name = PUZZLE_PACKS.get(*pack).map_or("next pack", |pack| pack.name);
            format!("unlocked {name}")
        }
        GameEvent::ScoreChanged { .. }
        | GameEvent::TrayRefilled
        | GameEvent::Undone
        | GameEvent::Redone => return None,
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use timbertiles_core::{Color, Grid, LineClear};
    use timbertiles_game::{GameMode, MemoryStore, SessionConfig};

    use super::*;

    fn shape(text: &str) -> Shape {
        Shape::new(text.parse().unwrap(), Color::from_rgb(0xff6b6b))
    }

    #[test]
    fn test_tray_view_lines_up_slots() {
        let slots = [Some(shape("#./##")), None, Some(shape("####"))];
        assert_eq!(
            TrayView(&slots).to_string(),
            "  [0]  [1]  [2]\n  #    -    ####\n  ##\n"
        );
    }

    #[test]
    fn test_session_view_marks_puzzle_targets() {
        let config = SessionConfig {
            mode: GameMode::Puzzle { id: 0 },
            ..SessionConfig::default()
        };
        let mut session = Session::new(config, Profile::new(MemoryStore::default())).unwrap();
        session.start().unwrap();

        let view = SessionView(&session).to_string();
        assert!(view.starts_with("    0 1 2 3 4 5 6 7 8 9\n"));
        assert!(view.contains("  3 . . . . @ . . . . .\n"));
        assert!(view.ends_with("score 0  best 0  coins 0  [playing]\n"));
    }

    #[test]
    fn test_describe_event() {
        let mut grid = Grid::new(2);
        grid.place(&shape("##"), 0, 0).unwrap();
        let clear: LineClear = grid.clear_full_lines();
        assert_eq!(
            describe_event(&GameEvent::LinesCleared { clear, bonus: 10 }).as_deref(),
            Some("cleared 1 line for 10 points")
        );
        assert_eq!(describe_event(&GameEvent::Undone), None);
        assert_eq!(
            describe_event(&GameEvent::PackUnlocked { pack: 1 }).as_deref(),
            Some("unlocked Challenge Pack")
        );
    }

    #[test]
    fn test_stats_view_lists_powerups() {
        let mut profile = Profile::new(MemoryStore::default());
        profile.add_powerup(PowerupKind::SwapTray, 2);
        let view = StatsView(&profile).to_string();
        assert!(view.contains("SWAP TRAY       2\n"));
        assert!(view.contains("coins           0\n"));
    }

    #[test]
    fn test_puzzles_view_shows_locks() {
        let mut profile = Profile::new(MemoryStore::default());
        profile.mark_puzzle_completed(1);
        let view = PuzzlesView(&profile).to_string();
        assert!(view.starts_with("Starter Pack\n"));
        assert!(view.contains("  [x] 1: Clear all four corners\n"));
        assert!(view.contains("Challenge Pack (locked)\n"));
    }
}
