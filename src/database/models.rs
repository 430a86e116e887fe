use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The status of a tournament. Stored as text in the database.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    sqlx::Type,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
)]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

impl TournamentStatus {
    fn rank(self) -> u8 {
        match self {
            TournamentStatus::Open => 0,
            TournamentStatus::InProgress => 1,
            TournamentStatus::Completed => 2,
        }
    }

    /// Whether moving to `next` keeps the open -> in_progress -> completed
    /// lifecycle moving forward. Re-asserting the current status and skipping
    /// ahead are both allowed; walking backwards is not.
    pub fn can_transition_to(self, next: TournamentStatus) -> bool {
        next.rank() >= self.rank()
    }
}

/// The status of a match. A match starts pending and completes exactly once,
/// when its winner is committed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    sqlx::Type,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
)]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// A tournament within the database.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Tournament {
    pub tournament_id: String,
    pub name: String,
    pub status: TournamentStatus,
    pub created_at: i64,
}

/// A player registered into a tournament.
///
/// `seed_number` stays `None` until a seed is explicitly assigned; a seed of
/// zero is a real seed, not a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Player {
    pub tournament_id: String,
    pub discord_user_id: String,
    pub discord_username: String,
    pub invite_link: String,
    pub seed_number: Option<i32>,
    pub is_eliminated: bool,
    pub registered_at: i64,
}

/// A match within the database, associated with a particular tournament.
///
/// Also known as a bracket to avoid conflicting with the Rust keyword.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub tournament_id: String,
    pub match_number: i32,
    pub player1_id: String,
    pub player2_id: String,
    pub winner_id: Option<String>,
    pub status: MatchStatus,
    pub created_at: i64,
}

impl Match {
    /// Whether the given user occupies one of the two player slots.
    pub fn has_participant(&self, discord_user_id: &str) -> bool {
        self.player1_id == discord_user_id || self.player2_id == discord_user_id
    }

    /// The other player in the pairing, if `discord_user_id` is part of it.
    pub fn opponent_of(&self, discord_user_id: &str) -> Option<&str> {
        if self.player1_id == discord_user_id {
            Some(self.player2_id.as_str())
        } else if self.player2_id == discord_user_id {
            Some(self.player1_id.as_str())
        } else {
            None
        }
    }
}

/// One recorded sub-outcome within a match. Rounds are append-only and form
/// the audit trail from which a match's result could be re-derived.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Round {
    pub match_id: i64,
    pub round_number: i32,
    pub winner_id: String,
    pub recorded_at: i64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn status_moves_forward_only() {
        use TournamentStatus::*;

        assert!(Open.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Open.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(InProgress));

        assert!(!Completed.can_transition_to(Open));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Open));
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!(TournamentStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            TournamentStatus::from_str("in_progress").unwrap(),
            TournamentStatus::InProgress
        );
        assert_eq!(MatchStatus::Pending.to_string(), "pending");
        assert!(TournamentStatus::from_str("paused").is_err());
    }

    #[test]
    fn opponent_lookup() {
        let game_match = Match {
            id: 1,
            tournament_id: "t1".to_string(),
            match_number: 1,
            player1_id: "alice".to_string(),
            player2_id: "bob".to_string(),
            winner_id: None,
            status: MatchStatus::Pending,
            created_at: 0,
        };

        assert!(game_match.has_participant("alice"));
        assert!(!game_match.has_participant("carol"));
        assert_eq!(game_match.opponent_of("alice"), Some("bob"));
        assert_eq!(game_match.opponent_of("bob"), Some("alice"));
        assert_eq!(game_match.opponent_of("carol"), None);
    }
}
