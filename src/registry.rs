use tracing::info;

use crate::database::models::Player;
use crate::database::{PlayerDatabase, SqliteDatabase};
use crate::error::{Error, Result};

/// Membership and ranking state for players within a tournament.
#[derive(Debug, Clone)]
pub struct PlayerRegistry {
    db: SqliteDatabase,
}

impl PlayerRegistry {
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }

    /// Registers a player into a tournament.
    ///
    /// The unique (tournament, user) constraint is the authority here: a
    /// duplicate registration fails with [`Error::PlayerAlreadyRegistered`]
    /// whether or not the caller pre-checked with [`Self::is_registered`].
    pub async fn register(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
        discord_username: &str,
        invite_link: &str,
    ) -> Result<()> {
        self.db
            .register_player(tournament_id, discord_user_id, discord_username, invite_link)
            .await?;
        info!(
            "Registered player {} into tournament {}",
            discord_user_id, tournament_id
        );
        Ok(())
    }

    pub async fn is_registered(&self, tournament_id: &str, discord_user_id: &str) -> Result<bool> {
        self.db
            .is_player_registered(tournament_id, discord_user_id)
            .await
    }

    /// Assigns a seed, overwriting any prior value. Seed uniqueness and
    /// contiguity within a tournament are the caller's responsibility.
    pub async fn assign_seed(
        &self,
        tournament_id: &str,
        discord_user_id: &str,
        seed: i32,
    ) -> Result<()> {
        self.db.set_seed(tournament_id, discord_user_id, seed).await
    }

    /// Marks a player as out of the tournament. Elimination is one-way: once
    /// set, no operation resets it.
    pub async fn eliminate(&self, tournament_id: &str, discord_user_id: &str) -> Result<()> {
        self.db
            .eliminate_player(tournament_id, discord_user_id)
            .await?;
        info!(
            "Eliminated player {} from tournament {}",
            discord_user_id, tournament_id
        );
        Ok(())
    }

    /// Retrieves a registered player.
    pub async fn lookup(&self, tournament_id: &str, discord_user_id: &str) -> Result<Player> {
        self.db
            .get_player(tournament_id, discord_user_id)
            .await?
            .ok_or_else(|| Error::PlayerNotFound {
                tournament_id: tournament_id.to_string(),
                discord_user_id: discord_user_id.to_string(),
            })
    }

    /// Retrieves a tournament's players ordered by seed, unseeded first.
    pub async fn list_for_tournament(&self, tournament_id: &str) -> Result<Vec<Player>> {
        self.db.get_players(tournament_id).await
    }
}
