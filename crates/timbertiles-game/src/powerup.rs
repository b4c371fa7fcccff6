use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coins charged for one power-up charge.
pub const POWERUP_PRICE: u32 = 5;

/// A purchasable one-shot helper.
///
/// The stored token of each kind is its upper-case name (`CLEAR_ROW`,
/// `SWAP_TRAY`, `EXTRA_UNDO`); [`Display`](std::fmt::Display) gives the label
/// shown to players.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerupKind {
    /// Empty a chosen row for free.
    #[display("CLEAR ROW")]
    ClearRow,
    /// Deal three new shapes into the tray.
    #[display("SWAP TRAY")]
    SwapTray,
    /// Take back the last action.
    #[display("EXTRA UNDO")]
    ExtraUndo,
}

/// Error for a power-up token outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid power-up type {token:?}: expected CLEAR_ROW, SWAP_TRAY or EXTRA_UNDO")]
pub struct InvalidPowerupType {
    /// The rejected token.
    pub token: String,
}

impl PowerupKind {
    /// All kinds in inventory order.
    pub const ALL: [Self; 3] = [Self::ClearRow, Self::SwapTray, Self::ExtraUndo];

    /// Returns the stored token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::ClearRow => "CLEAR_ROW",
            Self::SwapTray => "SWAP_TRAY",
            Self::ExtraUndo => "EXTRA_UNDO",
        }
    }
}

impl FromStr for PowerupKind {
    type Err = InvalidPowerupType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.token() == s)
            .ok_or_else(|| InvalidPowerupType {
                token: s.to_owned(),
            })
    }
}

/// Power-up charges owned by the player.
///
/// Serialized as an object with exactly the three token keys. Unknown keys are
/// ignored when reading and never written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct PowerupInventory {
    clear_row: u32,
    swap_tray: u32,
    extra_undo: u32,
}

impl PowerupInventory {
    /// Returns the charges of `kind`.
    #[must_use]
    pub fn count(&self, kind: PowerupKind) -> u32 {
        match kind {
            PowerupKind::ClearRow => self.clear_row,
            PowerupKind::SwapTray => self.swap_tray,
            PowerupKind::ExtraUndo => self.extra_undo,
        }
    }

    fn slot_mut(&mut self, kind: PowerupKind) -> &mut u32 {
        match kind {
            PowerupKind::ClearRow => &mut self.clear_row,
            PowerupKind::SwapTray => &mut self.swap_tray,
            PowerupKind::ExtraUndo => &mut self.extra_undo,
        }
    }

    /// Adds `count` charges of `kind`.
    pub fn add(&mut self, kind: PowerupKind, count: u32) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(count);
    }

    /// Removes one charge of `kind`. Returns `false` if there was none.
    pub fn take(&mut self, kind: PowerupKind) -> bool {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}
