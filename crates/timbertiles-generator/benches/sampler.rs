//! Benchmarks for shape sampling and daily challenge generation.
//!
//! # Benchmarks
//!
//! - **`sample_tray`**: Draws a full tray from the difficult catalog with `Pcg64`.
//! - **`daily_challenge`**: Generates the daily board and tray for fixed dates.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench sampler
//! ```

use std::{hint, time::Duration};

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, PlottingBackend, criterion_group, criterion_main};
use timbertiles_core::{Difficulty, Theme};
use timbertiles_generator::{DailyChallenge, ShapeSampler, shape_rng};

const DATES: [(i32, u32, u32); 3] = [(2024, 1, 1), (2024, 7, 15), (2025, 12, 31)];

fn bench_sample_tray(c: &mut Criterion) {
    let sampler = ShapeSampler::new(Difficulty::Difficult, Theme::default().palette());
    let mut rng = shape_rng(Some(0));
    c.bench_function("sample_tray", |b| {
        b.iter(|| sampler.sample_tray(hint::black_box(&mut rng)));
    });
}

fn bench_daily_challenge(c: &mut Criterion) {
    let sampler = ShapeSampler::new(Difficulty::Easy, Theme::default().palette());
    for (y, m, d) in DATES {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        c.bench_with_input(
            BenchmarkId::new("daily_challenge", date),
            &date,
            |b, date| {
                b.iter(|| DailyChallenge::generate(hint::black_box(*date), &sampler, 10));
            },
        );
    }
}

criterion_group!(
    name = benches;
    config =
        Criterion::default()
            .plotting_backend(PlottingBackend::Plotters)
            .measurement_time(Duration::from_secs(5));
    targets =
        bench_sample_tray,
        bench_daily_challenge
);
criterion_main!(benches);
