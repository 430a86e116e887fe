//! Persistence and progression engine for single-elimination tournaments.
//!
//! The engine owns the durable bracket state: tournaments, the players
//! registered into them, the matches pairing those players and the per-round
//! results leading to each match's outcome. A command layer (a Discord bot, a
//! CLI, a test harness) calls into the three managers, all of which read and
//! write through the shared SQLite store.

/// Match creation and the two-step outcome recording protocol.
pub mod bracket;
/// Traits and types used for interacting with the database.
pub mod database;
/// The error and result types shared across the engine.
pub mod error;
/// Membership and ranking state for players within a tournament.
pub mod registry;
/// Tournament creation and lifecycle transitions.
pub mod tournament;

pub use bracket::MatchController;
pub use database::SqliteDatabase;
pub use error::{Error, Result};
pub use registry::PlayerRegistry;
pub use tournament::TournamentManager;
