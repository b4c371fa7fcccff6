//! Benchmarks for grid placement checks and line clearing.
//!
//! # Benchmarks
//!
//! - **`can_place_scan`**: Tests every origin of a 10x10 grid for every easy
//!   catalog pattern, the work done when checking whether any move is left.
//! - **`clear_full_lines`**: Clears a board with several full rows and columns.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench grid
//! ```

use std::{hint, time::Duration};

use criterion::{BatchSize, Criterion, PlottingBackend, criterion_group, criterion_main};
use timbertiles_core::{Color, Difficulty, Grid, Position, Shape};

const BLUE: Color = Color::from_rgb(0x6b8cff);

// Checkerboard-ish board: every third cell filled.
fn sparse_grid() -> Grid {
    let mut grid = Grid::new(10);
    for row in 0..10 {
        for col in 0..10 {
            if (row + 2 * col) % 3 == 0 {
                grid.set(Position::new(row, col), Some(BLUE)).unwrap();
            }
        }
    }
    grid
}

fn crossed_grid() -> Grid {
    let mut grid = Grid::new(10);
    for i in 0..10 {
        for line in [1, 4, 8] {
            grid.set(Position::new(line, i), Some(BLUE)).unwrap();
            grid.set(Position::new(i, line), Some(BLUE)).unwrap();
        }
    }
    grid
}

fn bench_can_place_scan(c: &mut Criterion) {
    let grid = sparse_grid();
    let shapes: Vec<Shape> = Difficulty::Easy
        .patterns()
        .iter()
        .map(|pattern| Shape::new(pattern.clone(), BLUE))
        .collect();

    c.bench_function("can_place_scan", |b| {
        b.iter(|| {
            let mut legal = 0usize;
            for shape in &shapes {
                for row in 0..10 {
                    for col in 0..10 {
                        if hint::black_box(&grid).can_place(shape, row, col) {
                            legal += 1;
                        }
                    }
                }
            }
            legal
        });
    });
}

fn bench_clear_full_lines(c: &mut Criterion) {
    let grid = crossed_grid();
    c.bench_function("clear_full_lines", |b| {
        b.iter_batched(
            || hint::black_box(grid.clone()),
            |mut grid| grid.clear_full_lines(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    name = benches;
    config =
        Criterion::default()
            .plotting_backend(PlottingBackend::Plotters)
            .measurement_time(Duration::from_secs(5));
    targets =
        bench_can_place_scan,
        bench_clear_full_lines
);
criterion_main!(benches);
