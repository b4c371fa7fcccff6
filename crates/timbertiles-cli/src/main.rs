//! Terminal front-end for TimberTiles.
//!
//! Reads one command per line from stdin and prints the board after each one.
//! The player profile (best scores, coins, power-ups, puzzle progress) is kept in
//! a JSON file.
//!
//! # Usage
//!
//! ```sh
//! cargo run -- --mode endless --difficulty difficult --theme neon
//! cargo run -- --puzzle 2 --store ~/.timbertiles.json
//! RUST_LOG=debug cargo run -- --mode daily --date 2025-3-14
//! ```

use std::{
    io::{self, BufRead as _, Write as _},
    ops::ControlFlow,
    path::PathBuf,
    process,
};

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::info;
use timbertiles_core::{Difficulty, Theme};
use timbertiles_game::{GameError, GameEvent, GameMode, Profile, Session, SessionConfig};

use crate::{
    command::{Command, CommandError, HELP},
    file_store::JsonFileStore,
    render::{PuzzlesView, SessionView, StatsView},
};

mod command;
mod file_store;
mod render;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Normal,
    Endless,
    Daily,
    Puzzle,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Difficult,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Difficult => Self::Difficult,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Game mode. `--puzzle` implies `puzzle`.
    #[arg(long, value_name = "MODE", default_value = "normal")]
    mode: ModeArg,

    /// Difficulty tier; selects the shape catalog and board size.
    #[arg(long, value_name = "TIER", default_value = "easy")]
    difficulty: DifficultyArg,

    /// Theme whose palette colors the shapes (case-insensitive).
    #[arg(long, value_name = "THEME", default_value = "vibrant")]
    theme: String,

    /// Puzzle id to play.
    #[arg(long, value_name = "ID")]
    puzzle: Option<usize>,

    /// Seed for shape draws. Random if omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Date of the daily challenge as YYYY-M-D. Defaults to today.
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Board side length, overriding the difficulty default.
    #[arg(long, value_name = "SIZE")]
    grid_size: Option<usize>,

    /// JSON file holding the player profile.
    #[arg(long, value_name = "PATH", default_value = "timbertiles.json")]
    store: PathBuf,
}

impl Args {
    fn game_mode(&self) -> GameMode {
        match (self.puzzle, self.mode) {
            (Some(id), _) => GameMode::Puzzle { id },
            (None, ModeArg::Puzzle) => GameMode::Puzzle { id: 0 },
            (None, ModeArg::Normal) => GameMode::Normal,
            (None, ModeArg::Endless) => GameMode::Endless,
            (None, ModeArg::Daily) => GameMode::Daily,
        }
    }
}

fn main() {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    let Some(theme) = Theme::by_name(&args.theme) else {
        eprintln!("Unknown theme: {}", args.theme);
        eprintln!("Available themes:");
        for theme in Theme::ALL {
            eprintln!("  {}", theme.name());
        }
        process::exit(2);
    };

    let config = SessionConfig {
        mode: args.game_mode(),
        difficulty: args.difficulty.into(),
        theme,
        grid_size: args.grid_size,
        seed: args.seed,
        date: args.date,
        ..SessionConfig::default()
    };
    let store = JsonFileStore::open(&args.store);
    info!("profile at {}", store.path().display());

    let mut session = match Session::new(config, Profile::new(store)) {
        Ok(session) => session,
        Err(e @ GameError::PackLocked { .. }) => {
            eprintln!("Cannot start: {e}. Solve the previous pack first.");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Cannot start: {e}");
            process::exit(1);
        }
    };
    session.subscribe(|event: &GameEvent| {
        if let Some(line) = render::describe_event(event) {
            println!("{line}");
        }
    });
    if let Err(e) = session.start() {
        eprintln!("Cannot start: {e}");
        process::exit(1);
    }

    if let Some(puzzle) = session.current_puzzle() {
        println!("Puzzle {}: {}", puzzle.id(), puzzle.goal());
    }
    print!("{}", SessionView(&session));

    if let Err(e) = run(&mut session) {
        eprintln!("Input error: {e}");
        process::exit(1);
    }
}

fn run(session: &mut Session<JsonFileStore>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if execute(session, command).is_break() {
            return Ok(());
        }
    }
}

fn execute(session: &mut Session<JsonFileStore>, command: Command) -> ControlFlow<()> {
    let result = match command {
        Command::Place { slot, row, col } => session.attempt_placement(slot, row, col).map(|_| ()),
        Command::Preview { slot, row, col } => {
            if session.can_place_preview(slot, row, col) {
                println!("fits");
            } else {
                println!("does not fit");
            }
            return ControlFlow::Continue(());
        }
        Command::Undo => session.undo(),
        Command::Redo => session.redo(),
        Command::Remove(remedy) => session
            .remediate(remedy)
            .map(|report| println!("paid {} to remove {remedy}", report.cost)),
        Command::Buy(kind) => session.buy_powerup(kind).map(|()| {
            let count = session.profile().powerups().count(kind);
            println!("bought {kind}, {count} owned");
        }),
        Command::Use(action) => session.use_powerup(action),
        Command::GiveUp => session.give_up(),
        Command::Restart => session.restart(),
        Command::Show => Ok(()),
        Command::Stats => {
            print!("{}", StatsView(session.profile()));
            return ControlFlow::Continue(());
        }
        Command::Puzzles => {
            print!("{}", PuzzlesView(session.profile()));
            return ControlFlow::Continue(());
        }
        Command::Help => {
            println!("{HELP}");
            return ControlFlow::Continue(());
        }
        Command::Quit => return ControlFlow::Break(()),
    };

    match result {
        Ok(()) => print!("{}", SessionView(session)),
        Err(e) => println!("error: {e}"),
    }
    ControlFlow::Continue(())
}
