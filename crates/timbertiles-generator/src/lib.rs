//! Random and deterministic shape generation for TimberTiles.
//!
//! Ordinary play draws tray shapes from [`rand_pcg::Pcg64`]. The daily challenge
//! uses [`SeededRng`], a small 32-bit generator whose output depends only on the
//! seed string, so everyone playing on the same calendar day gets the same board
//! and tray.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use timbertiles_core::{Difficulty, Theme};
//! use timbertiles_generator::{DailyChallenge, ShapeSampler};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
//! let sampler = ShapeSampler::new(Difficulty::Easy, Theme::default().palette());
//! let a = DailyChallenge::generate(date, &sampler, 10);
//! let b = DailyChallenge::generate(date, &sampler, 10);
//!
//! assert_eq!(a, b);
//! assert_eq!(a.seed, "2024-3-7");
//! ```

pub use self::{daily::*, sampler::*, seeded_rng::*};

mod daily;
mod sampler;
mod seeded_rng;
