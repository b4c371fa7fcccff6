//! Prints the daily challenge board and tray for a date.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example daily_challenge
//! ```
//!
//! Pick a date, tier and theme:
//!
//! ```sh
//! cargo run --example daily_challenge -- --date 2025-3-14 --difficulty difficult --theme neon
//! ```
//!
//! Print a week of challenges starting at the date:
//!
//! ```sh
//! cargo run --example daily_challenge -- --days 7
//! ```

use std::process;

use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use timbertiles_core::{Difficulty, Theme};
use timbertiles_generator::{DailyChallenge, ShapeSampler};

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
    /// Calendar date as YYYY-M-D. Defaults to today.
    #[arg(long, value_name = "DATE")]
    date: Option<String>,

    /// Difficulty tier; selects the catalog and board size.
    #[arg(long, value_name = "TIER", default_value = "easy")]
    difficulty: DifficultyArg,

    /// Theme whose palette colors the shapes (case-insensitive).
    #[arg(long, value_name = "THEME", default_value = "vibrant")]
    theme: String,

    /// Number of consecutive days to print.
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    days: u32,
}

fn main() {
    let args = Args::parse();

    let Some(theme) = Theme::by_name(&args.theme) else {
        eprintln!("Unknown theme: {}", args.theme);
        eprintln!("Available themes:");
        for theme in Theme::ALL {
            eprintln!("  {}", theme.name());
        }
        process::exit(2);
    };

    let start = match &args.date {
        Some(text) => match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                eprintln!("Invalid date {text:?}: {e}");
                process::exit(2);
            }
        },
        None => Local::now().date_naive(),
    };

    let difficulty = Difficulty::from(args.difficulty);
    let sampler = ShapeSampler::new(difficulty, theme.palette());
    for date in start.iter_days().take(args.days as usize) {
        let challenge = DailyChallenge::generate(date, &sampler, difficulty.default_grid_size());
        print_challenge(&challenge);
    }
}

fn print_challenge(challenge: &DailyChallenge) {
    println!("Seed:");
    println!("  {}", challenge.seed);
    println!();
    println!("Board:");
    for line in challenge.grid.to_string().lines() {
        println!("  {line}");
    }
    println!();
    println!("Tray:");
    for (i, shape) in challenge.tray.iter().enumerate() {
        println!("  {i}: {} {}", shape.pattern(), shape.color());
    }
    println!();
}
