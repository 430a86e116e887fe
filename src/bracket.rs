use tracing::info;

use crate::database::models::{Match, MatchStatus, Round};
use crate::database::{MatchDatabase, PlayerDatabase, SqliteDatabase};
use crate::error::{Error, Result};

/// Match creation and the two-step outcome recording protocol: rounds are
/// appended as they finish, then the match winner is committed exactly once.
#[derive(Debug, Clone)]
pub struct MatchController {
    db: SqliteDatabase,
}

impl MatchController {
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }

    /// Pairs two registered players into a new pending match and returns the
    /// generated match id.
    ///
    /// Both players must be distinct and registered in the tournament; match
    /// numbers are caller-assigned and not checked for uniqueness.
    pub async fn create_match(
        &self,
        tournament_id: &str,
        match_number: i32,
        player1_id: &str,
        player2_id: &str,
    ) -> Result<i64> {
        if player1_id == player2_id {
            return Err(Error::PlayersNotDistinct);
        }
        for discord_user_id in [player1_id, player2_id] {
            if self.db.get_player(tournament_id, discord_user_id).await?.is_none() {
                return Err(Error::PlayerNotFound {
                    tournament_id: tournament_id.to_string(),
                    discord_user_id: discord_user_id.to_string(),
                });
            }
        }

        let match_id = self
            .db
            .create_match(tournament_id, match_number, player1_id, player2_id)
            .await?;
        info!(
            "Created match {} (#{}) in tournament {}: {} vs {}",
            match_id, match_number, tournament_id, player1_id, player2_id
        );
        Ok(match_id)
    }

    /// Retrieves a match by id.
    pub async fn get_match(&self, match_id: i64) -> Result<Match> {
        self.db
            .get_match(match_id)
            .await?
            .ok_or(Error::MatchNotFound(match_id))
    }

    /// Appends one round result to a pending match's audit trail.
    ///
    /// Round numbers are caller-assigned; duplicates are accepted. A match
    /// that already has its winner committed takes no further rounds.
    pub async fn record_round(
        &self,
        match_id: i64,
        round_number: i32,
        winner_id: &str,
    ) -> Result<()> {
        let game_match = self.get_match(match_id).await?;
        if game_match.status == MatchStatus::Completed {
            return Err(Error::MatchAlreadyCompleted(match_id));
        }

        self.db.record_round(match_id, round_number, winner_id).await
    }

    /// Commits the match outcome, moving the match from pending to completed.
    ///
    /// The winner must be one of the match's two players, and a completed
    /// match cannot be decided again.
    pub async fn set_winner(&self, match_id: i64, winner_id: &str) -> Result<()> {
        let game_match = self.get_match(match_id).await?;
        if game_match.status == MatchStatus::Completed {
            return Err(Error::MatchAlreadyCompleted(match_id));
        }
        if !game_match.has_participant(winner_id) {
            return Err(Error::InvalidWinner {
                match_id,
                winner_id: winner_id.to_string(),
            });
        }

        self.db.set_match_winner(match_id, winner_id).await?;
        info!("Match {} won by {}", match_id, winner_id);
        Ok(())
    }

    /// Retrieves a match's recorded rounds ordered by round number.
    pub async fn list_rounds(&self, match_id: i64) -> Result<Vec<Round>> {
        self.db.get_rounds(match_id).await
    }
}
