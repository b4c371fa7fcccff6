use std::collections::BTreeSet;

/// A stage of adventure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter index.
    pub id: usize,
    /// Display name.
    pub name: &'static str,
    /// Reward tokens granted on completion.
    pub unlocks: &'static [&'static str],
}

/// Adventure chapters in play order.
pub const CHAPTERS: [Chapter; 3] = [
    Chapter {
        id: 0,
        name: "Forest Start",
        unlocks: &["theme_forest"],
    },
    Chapter {
        id: 1,
        name: "Crystal Lake",
        unlocks: &["theme_crystal"],
    },
    Chapter {
        id: 2,
        name: "Mountain Pass",
        unlocks: &["theme_mountain"],
    },
];

/// Which chapters are open and finished. Kept in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdventureProgress {
    unlocked: BTreeSet<usize>,
    completed: BTreeSet<usize>,
}

impl Default for AdventureProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl AdventureProgress {
    /// Fresh progress with only the first chapter open.
    #[must_use]
    pub fn new() -> Self {
        Self {
            unlocked: BTreeSet::from([0]),
            completed: BTreeSet::new(),
        }
    }

    /// Returns `true` if chapter `id` can be played.
    #[must_use]
    pub fn is_unlocked(&self, id: usize) -> bool {
        self.unlocked.contains(&id)
    }

    /// Returns `true` if chapter `id` has been completed.
    #[must_use]
    pub fn is_completed(&self, id: usize) -> bool {
        self.completed.contains(&id)
    }

    /// Marks chapter `id` completed and opens the one after it.
    ///
    /// Returns `false` without changes if `id` was already completed.
    pub fn complete_chapter(&mut self, id: usize) -> bool {
        if !self.completed.insert(id) {
            return false;
        }
        let next = id + 1;
        if next < CHAPTERS.len() {
            self.unlocked.insert(next);
        }
        true
    }

    /// Reward tokens earned by completed chapters, in chapter order.
    pub fn rewards(&self) -> impl Iterator<Item = &'static str> + '_ {
        CHAPTERS
            .iter()
            .filter(|chapter| self.is_completed(chapter.id))
            .flat_map(|chapter| chapter.unlocks.iter().copied())
    }
}
