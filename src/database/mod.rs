use std::str::FromStr;

use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{Error, Result};
use models::{Match, MatchStatus, Player, Round, Tournament, TournamentStatus};

/// Models for the database.
///
/// Each model maps directly to a table in the schema.
pub mod models;

/// The SQLite database used for the tournament engine.
///
/// The pool is capped at a single connection, so concurrent callers sharing
/// one handle serialize their statements instead of interleaving writes on a
/// shared connection.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pub pool: SqlitePool,
}

impl SqliteDatabase {
    /// Connects using the `DATABASE_URL` environment variable.
    pub async fn connect() -> Result<Self> {
        #[cfg(debug_assertions)]
        dotenv::dotenv().ok();

        let db_url = std::env::var("DATABASE_URL").map_err(|_| Error::MissingDatabaseUrl)?;
        Self::connect_with(&db_url).await
    }

    /// Connects to the given SQLite URL, creating the database file if needed.
    pub async fn connect_with(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        info!("Successfully connected to the database.");

        Ok(SqliteDatabase { pool })
    }

    /// Opens a migrated in-memory database. Used by tests and embedding
    /// callers that do not need durability.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with("sqlite::memory:").await?;
        db.migrate().await?;
        Ok(db)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Closes the pool, waiting for in-flight statements to finish. Further
    /// operations on this handle fail with a storage error.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed.");
    }
}

/// Maps constraint violations raised by an INSERT to domain errors, leaving
/// every other failure as a storage error.
fn map_violation(err: sqlx::Error, unique: Option<Error>, foreign_key: Option<Error>) -> Error {
    let kind = match &err {
        sqlx::Error::Database(db) => Some(db.kind()),
        _ => None,
    };
    match (kind, unique, foreign_key) {
        (Some(ErrorKind::UniqueViolation), Some(conflict), _) => conflict,
        (Some(ErrorKind::ForeignKeyViolation), _, Some(missing)) => missing,
        _ => Error::Database(err),
    }
}

/// Store operations for the tournaments relation.
///
/// The store enforces relational constraints only; transition legality lives
/// in [`crate::tournament::TournamentManager`].
#[allow(async_fn_in_trait)]
pub trait TournamentDatabase {
    type Error;

    /// Creates a tournament under a caller-supplied id, open by default.
    /// Fails if the id is already taken.
    async fn create_tournament(&self, tournament_id: &str, name: &str)
        -> Result<(), Self::Error>;

    /// Retrieves a tournament by its id.
    async fn get_tournament(&self, tournament_id: &str)
        -> Result<Option<Tournament>, Self::Error>;

    /// Retrieves all tournaments, newest-created first. Tournaments created
    /// within the same second are ordered by rowid, so insertion order wins.
    async fn get_all_tournaments(&self) -> Result<Vec<Tournament>, Self::Error>;

    /// Updates the status of a tournament. The store accepts any transition.
    async fn set_tournament_status(
        &self,
        tournament_id: &str,
        status: TournamentStatus,
    ) -> Result<(), Self::Error>;
}

impl TournamentDatabase for SqliteDatabase {
    type Error = Error;

    async fn create_tournament(&self, tournament_id: &str, name: &str) -> Result<()> {
        let created_at = chrono::Utc::now().timestamp();
        sqlx::query(
            r#"
            INSERT INTO tournaments (tournament_id, name, status, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(tournament_id)
        .bind(name)
        .bind(TournamentStatus::Open)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_violation(
                e,
                Some(Error::TournamentExists(tournament_id.to_string())),
                None,
            )
        })?;

        Ok(())
    }

    async fn get_tournament(&self, tournament_id: &str) -> Result<Option<Tournament>> {
        let tournament = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, status, created_at
            FROM tournaments
            WHERE tournament_id = ?
            LIMIT 1
            "#,
        )
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tournament)
    }

    async fn get_all_tournaments(&self) -> Result<Vec<Tournament>> {
        let tournaments = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT tournament_id, name, status, created_at
            FROM tournaments
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tournaments)
    }

    async fn set_tournament_status(
        &self,
        tournament_id: &str,
        status: TournamentStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tournaments
            SET status = ?
            WHERE tournament_id = ?
            "#,
        )
        .bind(status)
        .bind(tournament_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::TournamentNotFound(tournament_id.to_string()));
        }
        Ok(())
    }
}

/// Store operations for the players relation.
#[allow(async_fn_in_trait)]
pub trait PlayerDatabase {
    type Error;

    /// Registers a player into a tournament. The (tournament, user) pair is
    /// unique, so registering twice fails with a conflict.
    async fn register_player(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
        discord_username: &str,
        invite_link: &str,
    ) -> Result<(), Self::Error>;

    /// Convenience pre-check; `register_player` itself remains the authority.
    async fn is_player_registered(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
    ) -> Result<bool, Self::Error>;

    /// Retrieves a tournament's players ordered by seed number ascending.
    ///
    /// SQLite sorts NULL before any value, so unseeded players lead the list;
    /// rowid breaks ties.
    async fn get_players(&self, tournament_id: &str) -> Result<Vec<Player>, Self::Error>;

    /// Overwrites the player's seed number. Last write wins.
    async fn set_seed(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
        seed: i32,
    ) -> Result<(), Self::Error>;

    /// Marks a player as eliminated. Eliminating an already-eliminated player
    /// still succeeds.
    async fn eliminate_player(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
    ) -> Result<(), Self::Error>;

    /// Retrieves a single player by tournament and user id.
    async fn get_player(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
    ) -> Result<Option<Player>, Self::Error>;
}

impl PlayerDatabase for SqliteDatabase {
    type Error = Error;

    async fn register_player(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
        discord_username: &str,
        invite_link: &str,
    ) -> Result<()> {
        let registered_at = chrono::Utc::now().timestamp();
        sqlx::query(
            r#"
            INSERT INTO players (tournament_id, discord_user_id, discord_username, invite_link, registered_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(tournament_id)
        .bind(discord_user_id)
        .bind(discord_username)
        .bind(invite_link)
        .bind(registered_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_violation(
                e,
                Some(Error::PlayerAlreadyRegistered {
                    tournament_id: tournament_id.to_string(),
                    discord_user_id: discord_user_id.to_string(),
                }),
                Some(Error::TournamentNotFound(tournament_id.to_string())),
            )
        })?;

        Ok(())
    }

    async fn is_player_registered(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
    ) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM players
            WHERE tournament_id = ? AND discord_user_id = ?
            "#,
        )
        .bind(tournament_id)
        .bind(discord_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn get_players(&self, tournament_id: &str) -> Result<Vec<Player>> {
        let players = sqlx::query_as::<_, Player>(
            r#"
            SELECT tournament_id, discord_user_id, discord_username, invite_link,
                   seed_number, is_eliminated, registered_at
            FROM players
            WHERE tournament_id = ?
            ORDER BY seed_number ASC, id ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(players)
    }

    async fn set_seed(&self, tournament_id: &str, discord_user_id: &str, seed: i32) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE players
            SET seed_number = ?
            WHERE tournament_id = ? AND discord_user_id = ?
            "#,
        )
        .bind(seed)
        .bind(tournament_id)
        .bind(discord_user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::PlayerNotFound {
                tournament_id: tournament_id.to_string(),
                discord_user_id: discord_user_id.to_string(),
            });
        }
        Ok(())
    }

    async fn eliminate_player(&self, tournament_id: &str, discord_user_id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE players
            SET is_eliminated = TRUE
            WHERE tournament_id = ? AND discord_user_id = ?
            "#,
        )
        .bind(tournament_id)
        .bind(discord_user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::PlayerNotFound {
                tournament_id: tournament_id.to_string(),
                discord_user_id: discord_user_id.to_string(),
            });
        }
        Ok(())
    }

    async fn get_player(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
    ) -> Result<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            SELECT tournament_id, discord_user_id, discord_username, invite_link,
                   seed_number, is_eliminated, registered_at
            FROM players
            WHERE tournament_id = ? AND discord_user_id = ?
            LIMIT 1
            "#,
        )
        .bind(tournament_id)
        .bind(discord_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(player)
    }
}

/// Store operations for the matches and rounds relations.
#[allow(async_fn_in_trait)]
pub trait MatchDatabase {
    type Error;

    /// Creates a match between two players, returning the generated match id.
    async fn create_match(
        &self,
        tournament_id: &str,
        match_number: i32,
        player1_id: &str,
        player2_id: &str,
    ) -> Result<i64, Self::Error>;

    /// Retrieves a match by its generated id.
    async fn get_match(&self, match_id: i64) -> Result<Option<Match>, Self::Error>;

    /// Sets the winner and completes the match in a single statement.
    ///
    /// The store applies the update unconditionally; participant and state
    /// checks live in [`crate::bracket::MatchController`].
    async fn set_match_winner(&self, match_id: i64, winner_id: &str) -> Result<(), Self::Error>;

    /// Appends a round result to a match's audit trail. Round numbers are not
    /// checked for uniqueness or bounds.
    async fn record_round(
        &self,
        match_id: i64,
        round_number: i32,
        winner_id: &str,
    ) -> Result<(), Self::Error>;

    /// Retrieves a match's recorded rounds ordered by round number ascending.
    /// Duplicate round numbers are listed in insertion order.
    async fn get_rounds(&self, match_id: i64) -> Result<Vec<Round>, Self::Error>;
}

impl MatchDatabase for SqliteDatabase {
    type Error = Error;

    async fn create_match(
        &self,
        tournament_id: &str,
        match_number: i32,
        player1_id: &str,
        player2_id: &str,
    ) -> Result<i64> {
        let created_at = chrono::Utc::now().timestamp();
        let match_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO matches (tournament_id, match_number, player1_id, player2_id, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(tournament_id)
        .bind(match_number)
        .bind(player1_id)
        .bind(player2_id)
        .bind(MatchStatus::Pending)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_violation(
                e,
                None,
                Some(Error::TournamentNotFound(tournament_id.to_string())),
            )
        })?;

        Ok(match_id)
    }

    async fn get_match(&self, match_id: i64) -> Result<Option<Match>> {
        let game_match = sqlx::query_as::<_, Match>(
            r#"
            SELECT id, tournament_id, match_number, player1_id, player2_id,
                   winner_id, status, created_at
            FROM matches
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(game_match)
    }

    async fn set_match_winner(&self, match_id: i64, winner_id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET winner_id = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(winner_id)
        .bind(MatchStatus::Completed)
        .bind(match_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::MatchNotFound(match_id));
        }
        Ok(())
    }

    async fn record_round(&self, match_id: i64, round_number: i32, winner_id: &str) -> Result<()> {
        let recorded_at = chrono::Utc::now().timestamp();
        sqlx::query(
            r#"
            INSERT INTO rounds (match_id, round_number, winner_id, recorded_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(match_id)
        .bind(round_number)
        .bind(winner_id)
        .bind(recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_violation(e, None, Some(Error::MatchNotFound(match_id))))?;

        Ok(())
    }

    async fn get_rounds(&self, match_id: i64) -> Result<Vec<Round>> {
        let rounds = sqlx::query_as::<_, Round>(
            r#"
            SELECT match_id, round_number, winner_id, recorded_at
            FROM rounds
            WHERE match_id = ?
            ORDER BY round_number ASC, id ASC
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rounds)
    }
}
