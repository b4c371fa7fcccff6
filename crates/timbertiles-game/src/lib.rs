//! Game session logic for TimberTiles.
//!
//! This crate sits between the pure rules in `timbertiles-core` and a front-end.
//! A [`Session`] owns the grid, the three-slot [`Tray`], the score and the undo
//! history, and reports what happened through [`GameEvent`]s so that a renderer
//! never has to be referenced from here. Player records (best scores, coins,
//! power-ups, puzzle progress) live in a [`Profile`] backed by any
//! [`KeyValueStore`].
//!
//! # Example
//!
//! ```
//! use timbertiles_game::{GameMode, MemoryStore, Profile, Session, SessionConfig};
//!
//! let config = SessionConfig {
//!     mode: GameMode::Normal,
//!     seed: Some(42),
//!     ..SessionConfig::default()
//! };
//! let mut session = Session::new(config, Profile::new(MemoryStore::default())).unwrap();
//! session.start().unwrap();
//!
//! assert!(session.phase().is_playing());
//! assert_eq!(session.tray().remaining(), 3);
//! assert_eq!(session.score(), 0);
//! ```

pub use self::{
    adventure::*, error::*, events::*, history::*, powerup::*, profile::*, puzzle::*,
    scoring::*, session::*, store::*, tray::*,
};

mod adventure;
mod error;
mod events;
mod history;
mod powerup;
mod profile;
mod puzzle;
mod scoring;
mod session;
mod store;
mod tray;
