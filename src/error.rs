use thiserror::Error;

use crate::database::models::TournamentStatus;

/// The error type shared by every component of the engine.
///
/// Lookups and updates that matched nothing report a `*NotFound` variant,
/// uniqueness violations on create/register report the matching conflict
/// variant, and failures where the store could not run the operation at all
/// come back as [`Error::Database`] or [`Error::Migrate`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("tournament {0} does not exist")]
    TournamentNotFound(String),

    #[error("tournament {0} already exists")]
    TournamentExists(String),

    #[error("player {discord_user_id} is not registered in tournament {tournament_id}")]
    PlayerNotFound {
        tournament_id: String,
        discord_user_id: String,
    },

    #[error("player {discord_user_id} is already registered in tournament {tournament_id}")]
    PlayerAlreadyRegistered {
        tournament_id: String,
        discord_user_id: String,
    },

    #[error("match {0} does not exist")]
    MatchNotFound(i64),

    #[error("match {0} is already completed")]
    MatchAlreadyCompleted(i64),

    #[error("{winner_id} is not a participant of match {match_id}")]
    InvalidWinner { match_id: i64, winner_id: String },

    #[error("a match requires two distinct players")]
    PlayersNotDistinct,

    #[error("cannot move tournament status from {from} to {to}")]
    InvalidTransition {
        from: TournamentStatus,
        to: TournamentStatus,
    },

    #[error("DATABASE_URL environment variable not found")]
    MissingDatabaseUrl,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
