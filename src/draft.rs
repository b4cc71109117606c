//! In-progress match recording and its mapping to the `POST /matches` body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::api_error::ApiError;
use crate::models::{GameId, Team, UserId, UserRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Game is required")]
    GameRequired,

    #[error("Outcome is required")]
    OutcomeRequired,

    #[error("{} needs at least one player", .0.label())]
    EmptyRoster(Team),

    #[error("Player {user_id} is already on {}", .team.label())]
    AlreadyAssigned { user_id: UserId, team: Team },

    #[error("Player {0} is on both teams")]
    PlayerOnBothTeams(UserId),
}

impl From<DraftError> for ApiError {
    fn from(err: DraftError) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

/// Outcome as selected on the recording form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "teamA")]
    TeamA,
    #[serde(rename = "teamB")]
    TeamB,
    #[serde(rename = "draw")]
    Draw,
}

impl From<Team> for Outcome {
    fn from(team: Team) -> Self {
        match team {
            Team::A => Outcome::TeamA,
            Team::B => Outcome::TeamB,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamDraft {
    pub members: Vec<UserId>,
    pub score: u32,
}

impl TeamDraft {
    pub fn contains(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchDraft {
    game_id: Option<GameId>,
    outcome: Option<Outcome>,
    team_a: TeamDraft,
    team_b: TeamDraft,
    played_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    pub member_ids: Vec<UserId>,
    pub score: u32,
}

/// Wire body of `POST /matches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPayload {
    pub game_id: GameId,
    pub result: Outcome,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub played_at: Option<DateTime<Utc>>,
    pub team_a: TeamPayload,
    pub team_b: TeamPayload,
}

impl MatchDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn team(&self, team: Team) -> &TeamDraft {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    fn team_mut(&mut self, team: Team) -> &mut TeamDraft {
        match team {
            Team::A => &mut self.team_a,
            Team::B => &mut self.team_b,
        }
    }

    pub fn select_game(&mut self, game_id: GameId) {
        self.game_id = Some(game_id);
    }

    /// Back to game selection. Rosters, outcome and scores are kept.
    pub fn clear_game(&mut self) {
        self.game_id = None;
    }

    pub fn set_played_at(&mut self, played_at: DateTime<Utc>) {
        self.played_at = Some(played_at);
    }

    pub fn team_of(&self, user_id: UserId) -> Option<Team> {
        if self.team_a.contains(user_id) {
            Some(Team::A)
        } else if self.team_b.contains(user_id) {
            Some(Team::B)
        } else {
            None
        }
    }

    pub fn add_player(&mut self, user_id: UserId, team: Team) -> Result<(), DraftError> {
        if let Some(current) = self.team_of(user_id) {
            return Err(DraftError::AlreadyAssigned {
                user_id,
                team: current,
            });
        }
        self.team_mut(team).members.push(user_id);
        Ok(())
    }

    /// Returns whether the player was on that team.
    pub fn remove_player(&mut self, user_id: UserId, team: Team) -> bool {
        let members = &mut self.team_mut(team).members;
        let before = members.len();
        members.retain(|id| *id != user_id);
        members.len() != before
    }

    /// Selecting the current value clears it. A draw overrides a team pick,
    /// but a team pick is ignored while a draw is selected.
    pub fn set_outcome(&mut self, outcome: Option<Outcome>) {
        self.outcome = match (self.outcome, outcome) {
            (_, None) => None,
            (Some(current), Some(next)) if current == next => None,
            (Some(Outcome::Draw), Some(_)) => Some(Outcome::Draw),
            (_, Some(next)) => Some(next),
        };
    }

    pub fn set_score(&mut self, team: Team, score: u32) {
        self.team_mut(team).score = score;
    }

    /// Group members not yet assigned to either team, in the given order.
    pub fn available_players<'a>(&self, members: &'a [UserRef]) -> Vec<&'a UserRef> {
        members
            .iter()
            .filter(|u| self.team_of(u.id).is_none())
            .collect()
    }

    fn check_exclusive(&self) -> Result<(), DraftError> {
        match self.team_a.members.iter().find(|id| self.team_b.contains(**id)) {
            Some(id) => Err(DraftError::PlayerOnBothTeams(*id)),
            None => Ok(()),
        }
    }

    /// Full submit gate: game, outcome, both rosters and exclusivity.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.game_id.is_none() {
            return Err(DraftError::GameRequired);
        }
        if self.outcome.is_none() {
            return Err(DraftError::OutcomeRequired);
        }
        if self.team_a.members.is_empty() {
            return Err(DraftError::EmptyRoster(Team::A));
        }
        if self.team_b.members.is_empty() {
            return Err(DraftError::EmptyRoster(Team::B));
        }
        self.check_exclusive()
    }

    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn to_payload(&self) -> Result<MatchPayload, DraftError> {
        let game_id = self.game_id.ok_or(DraftError::GameRequired)?;
        self.check_exclusive()?;

        let result = match self.outcome {
            Some(outcome) => outcome,
            None => {
                warn!(game_id, "No outcome selected, submitting match as a draw");
                Outcome::Draw
            }
        };

        Ok(MatchPayload {
            game_id,
            result,
            played_at: self.played_at,
            team_a: TeamPayload {
                member_ids: self.team_a.members.clone(),
                score: self.team_a.score,
            },
            team_b: TeamPayload {
                member_ids: self.team_b.members.clone(),
                score: self.team_b.score,
            },
        })
    }
}
