use tracing::info;

use crate::database::models::{Tournament, TournamentStatus};
use crate::database::{SqliteDatabase, TournamentDatabase};
use crate::error::{Error, Result};

/// Creates tournaments and walks them through their lifecycle.
///
/// The store accepts any status transition; this manager is the gate that
/// keeps the open -> in_progress -> completed lifecycle moving forward.
#[derive(Debug, Clone)]
pub struct TournamentManager {
    db: SqliteDatabase,
}

impl TournamentManager {
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }

    /// Opens a new tournament under the caller-supplied id.
    pub async fn create(&self, tournament_id: &str, name: &str) -> Result<()> {
        self.db.create_tournament(tournament_id, name).await?;
        info!("Created tournament {} ({})", tournament_id, name);
        Ok(())
    }

    /// Retrieves all tournaments, newest-created first.
    pub async fn list(&self) -> Result<Vec<Tournament>> {
        self.db.get_all_tournaments().await
    }

    /// Retrieves a tournament by id.
    pub async fn get(&self, tournament_id: &str) -> Result<Tournament> {
        self.db
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| Error::TournamentNotFound(tournament_id.to_string()))
    }

    /// Moves a tournament to a new status.
    ///
    /// Walking the lifecycle backwards is rejected with
    /// [`Error::InvalidTransition`]; use [`Self::force_status`] when a
    /// correction is genuinely intended.
    pub async fn set_status(&self, tournament_id: &str, status: TournamentStatus) -> Result<()> {
        let current = self.get(tournament_id).await?;
        if !current.status.can_transition_to(status) {
            return Err(Error::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        self.db.set_tournament_status(tournament_id, status).await?;
        info!("Tournament {} is now {}", tournament_id, status);
        Ok(())
    }

    /// Sets a status without lifecycle checks, e.g. to reopen a tournament
    /// that was completed by mistake.
    pub async fn force_status(&self, tournament_id: &str, status: TournamentStatus) -> Result<()> {
        self.db.set_tournament_status(tournament_id, status).await
    }
}
