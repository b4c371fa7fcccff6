//! Built-in puzzles and the packs that group them.

use std::sync::LazyLock;

use timbertiles_core::{Color, Grid, Position, Shape, Theme};

/// A goal-directed board: clear every cell that starts filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    id: usize,
    goal: &'static str,
    grid: Grid,
    tray: Option<[Shape; 3]>,
}

impl Puzzle {
    /// Puzzle id, equal to its index in [`puzzles`].
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Short description shown to the player.
    #[must_use]
    pub fn goal(&self) -> &'static str {
        self.goal
    }

    /// Starting board.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Fixed opening tray, if the puzzle has one.
    #[must_use]
    pub fn tray(&self) -> Option<&[Shape; 3]> {
        self.tray.as_ref()
    }

    /// Cells that must all be empty for the puzzle to count as solved.
    #[must_use]
    pub fn targets(&self) -> Vec<Position> {
        self.grid.filled_positions().collect()
    }

    /// Index of the pack containing this puzzle.
    #[must_use]
    pub fn pack(&self) -> Option<usize> {
        pack_of(self.id)
    }
}

/// A group of puzzles unlocked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzlePack {
    /// Display name.
    pub name: &'static str,
    /// Ids of the puzzles in play order.
    pub puzzles: [usize; 3],
    /// Whether the pack is open on a fresh profile.
    pub unlocked_by_default: bool,
}

/// The packs in unlock order. Completing every puzzle of a pack unlocks the next.
pub const PUZZLE_PACKS: [PuzzlePack; 3] = [
    PuzzlePack {
        name: "Starter Pack",
        puzzles: [0, 1, 2],
        unlocked_by_default: true,
    },
    PuzzlePack {
        name: "Challenge Pack",
        puzzles: [3, 4, 5],
        unlocked_by_default: false,
    },
    PuzzlePack {
        name: "Expert Pack",
        puzzles: [6, 7, 8],
        unlocked_by_default: false,
    },
];

/// Returns the index of the pack containing `puzzle_id`.
#[must_use]
pub fn pack_of(puzzle_id: usize) -> Option<usize> {
    PUZZLE_PACKS
        .iter()
        .position(|pack| pack.puzzles.contains(&puzzle_id))
}

/// Returns all built-in puzzles, indexed by id.
#[must_use]
pub fn puzzles() -> &'static [Puzzle] {
    &PUZZLES
}

/// Returns the puzzle with `id`.
#[must_use]
pub fn puzzle(id: usize) -> Option<&'static Puzzle> {
    PUZZLES.get(id)
}

struct PuzzleSource {
    goal: &'static str,
    board: &'static [&'static str],
    tray: Option<[(&'static str, char); 3]>,
}

// Board letters `a` to `h` name the colors of the default theme in order.
const PUZZLE_SOURCES: &[PuzzleSource] = &[
    PuzzleSource {
        goal: "Clear the cross in the middle",
        board: &[
            "..........",
            "..........",
            "..........",
            "....b.....",
            "...bbb....",
            "....b.....",
            "..........",
            "..........",
            "..........",
            "..........",
        ],
        tray: Some([("##", 'a'), ("###", 'b'), ("#/#/#", 'c')]),
    },
    PuzzleSource {
        goal: "Clear all four corners",
        board: &[
            "a........b",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "c........e",
        ],
        tray: Some([("####", 'e'), ("#./##", 'f'), ("##/.#", 'h')]),
    },
    PuzzleSource {
        goal: "Clear the top and bottom bars",
        board: &[
            "cccccccc..",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..gggggggg",
        ],
        tray: Some([("##", 'd'), ("##", 'h'), ("#/#", 'a')]),
    },
    PuzzleSource {
        goal: "Clear the diagonal",
        board: &[
            "a........",
            ".a.......",
            "..a......",
            "...a.....",
            "....a....",
            ".....a...",
            "......a..",
            ".......a.",
            "........a",
        ],
        tray: None,
    },
    PuzzleSource {
        goal: "Clear the hollow box",
        board: &[
            ".........",
            ".........",
            ".........",
            "...eee...",
            "...e.e...",
            "...eee...",
            ".........",
            ".........",
            ".........",
        ],
        tray: Some([("###/#.#/###", 'c'), ("#", 'a'), ("###", 'f')]),
    },
    PuzzleSource {
        goal: "Clear both pillars",
        board: &[
            "f........",
            "f........",
            "f.......h",
            "f.......h",
            "f.......h",
            "f.......h",
            "f.......h",
            "........h",
            "........h",
        ],
        tray: None,
    },
    PuzzleSource {
        goal: "Clear the X",
        board: &[
            "g.......c",
            ".g.....c.",
            "..g...c..",
            "...g.c...",
            "....g....",
            "...c.g...",
            "..c...g..",
            ".c.....g.",
            "c.......g",
        ],
        tray: None,
    },
    PuzzleSource {
        goal: "Clear the whole frame",
        board: &[
            ".bbbbbbbb.",
            "d........d",
            "d........d",
            "d........d",
            "d........d",
            "d........d",
            "d........d",
            "d........d",
            "d........d",
            ".bbbbbbbb.",
        ],
        tray: None,
    },
    PuzzleSource {
        goal: "Clear every scattered block",
        board: &[
            "a....e....",
            "...a....e.",
            ".e....a...",
            "....e....a",
            "..a....e..",
            "e....a....",
            "...e....a.",
            ".a....e...",
            "....a....e",
            "..e....a..",
        ],
        tray: None,
    },
];

fn letter_color(letter: char) -> Option<Color> {
    let index = "abcdefgh".find(letter)?;
    Theme::VIBRANT.palette().colors().get(index).copied()
}

fn build_puzzle(id: usize, source: &PuzzleSource) -> Puzzle {
    let rows: Vec<Vec<Option<Color>>> = source
        .board
        .iter()
        .map(|row| {
            row.chars()
                .map(|ch| match ch {
                    '.' => None,
                    _ => Some(letter_color(ch).unwrap_or_else(|| {
                        panic!("puzzle {id}: invalid board letter {ch:?}")
                    })),
                })
                .collect()
        })
        .collect();
    let grid = Grid::from_rows(&rows).unwrap_or_else(|e| panic!("puzzle {id}: {e}"));
    let tray = source.tray.map(|shapes| {
        shapes.map(|(pattern, letter)| {
            let pattern = pattern
                .parse()
                .unwrap_or_else(|e| panic!("puzzle {id}: invalid tray pattern {pattern:?}: {e}"));
            let color = letter_color(letter)
                .unwrap_or_else(|| panic!("puzzle {id}: invalid tray letter {letter:?}"));
            Shape::new(pattern, color)
        })
    });
    Puzzle {
        id,
        goal: source.goal,
        grid,
        tray,
    }
}

static PUZZLES: LazyLock<Vec<Puzzle>> = LazyLock::new(|| {
    PUZZLE_SOURCES
        .iter()
        .enumerate()
        .map(|(id, source)| build_puzzle(id, source))
        .collect()
});
