use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::group::GameId;
use super::user::{UserId, UserRef};

pub type MatchId = u64;

/// Objective result of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchResult {
    TeamAWin,
    TeamBWin,
    Draw,
}

impl MatchResult {
    pub fn winner(&self) -> Option<Team> {
        match self {
            MatchResult::TeamAWin => Some(Team::A),
            MatchResult::TeamBWin => Some(Team::B),
            MatchResult::Draw => None,
        }
    }
}

/// One side of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Team {
    #[serde(rename = "teamA")]
    A,
    #[serde(rename = "teamB")]
    B,
}

impl Team {
    pub fn other(&self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Team::A => "Team A",
            Team::B => "Team B",
        }
    }
}

/// Review status of a submitted match - a small finite state machine
/// owned by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MatchStatus {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, to: &MatchStatus) -> bool {
        match (self, to) {
            // PENDING -> ACCEPTED or REJECTED
            (MatchStatus::Pending, MatchStatus::Accepted) => true,
            (MatchStatus::Pending, MatchStatus::Rejected) => true,
            // REJECTED -> ACCEPTED (forced by an admin)
            (MatchStatus::Rejected, MatchStatus::Accepted) => true,
            // Same state is allowed (idempotency)
            (a, b) if a == b => true,
            _ => false,
        }
    }

    pub fn valid_next_states(&self) -> Vec<MatchStatus> {
        match self {
            MatchStatus::Pending => vec![MatchStatus::Accepted, MatchStatus::Rejected],
            MatchStatus::Rejected => vec![MatchStatus::Accepted],
            MatchStatus::Accepted => vec![], // Terminal state
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Accepted)
    }

    /// Actions a given actor is offered for a match in this state.
    pub fn available_actions(&self, actor: Actor) -> Vec<MatchAction> {
        match (self, actor) {
            (MatchStatus::Pending, _) => vec![MatchAction::Accept, MatchAction::Reject],
            (MatchStatus::Rejected, Actor::GroupAdmin) => vec![MatchAction::Accept],
            (MatchStatus::Rejected, Actor::Participant) => vec![],
            (MatchStatus::Accepted, _) => vec![],
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "pending"),
            MatchStatus::Accepted => write!(f, "accepted"),
            MatchStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Who is deciding on a pending match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Participant,
    GroupAdmin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchAction {
    Accept,
    Reject,
}

impl MatchAction {
    pub fn target_status(&self) -> MatchStatus {
        match self {
            MatchAction::Accept => MatchStatus::Accepted,
            MatchAction::Reject => MatchStatus::Rejected,
        }
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            MatchAction::Accept => "accept",
            MatchAction::Reject => "reject",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub played_at: DateTime<Utc>,
    pub game_id: GameId,
    #[serde(default)]
    pub game: Option<GameRef>,
    pub team_a: Vec<UserRef>,
    pub team_b: Vec<UserRef>,
    #[serde(default)]
    pub score_a: Option<u32>,
    #[serde(default)]
    pub score_b: Option<u32>,
    pub result: MatchResult,
    #[serde(default)]
    pub status: Option<MatchStatus>,
    #[serde(default, alias = "creator")]
    pub created_by: Option<UserRef>,
}

impl Match {
    pub fn roster(&self, team: Team) -> &[UserRef] {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    pub fn score(&self, team: Team) -> Option<u32> {
        match team {
            Team::A => self.score_a,
            Team::B => self.score_b,
        }
    }

    pub fn team_of(&self, user_id: UserId) -> Option<Team> {
        if self.team_a.iter().any(|u| u.id == user_id) {
            Some(Team::A)
        } else if self.team_b.iter().any(|u| u.id == user_id) {
            Some(Team::B)
        } else {
            None
        }
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.team_of(user_id).is_some()
    }

    /// Both scores present and not both zero.
    pub fn has_recorded_score(&self) -> bool {
        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) => !(a == 0 && b == 0),
            _ => false,
        }
    }

    pub fn game_name(&self) -> Option<&str> {
        self.game.as_ref().map(|g| g.name.as_str())
    }
}

// ===== Match lists =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPage {
    pub data: Vec<Match>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFilter {
    #[default]
    All,
    Mine,
}

/// Query of the paginated group match history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub page: u32,
    pub limit: u32,
    pub game_id: Option<GameId>,
    pub filter: MatchFilter,
}

impl MatchQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            game_id: None,
            filter: MatchFilter::All,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn game(mut self, game_id: Option<GameId>) -> Self {
        self.game_id = game_id;
        self
    }

    /// Switching the filter starts over at page one.
    pub fn filter(mut self, filter: MatchFilter) -> Self {
        if self.filter != filter {
            self.page = 1;
        }
        self.filter = filter;
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(game_id) = self.game_id {
            pairs.push(("gameId", game_id.to_string()));
        }
        if self.filter == MatchFilter::Mine {
            pairs.push(("filter", "mine".to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_status_transitions() {
        let pending = MatchStatus::Pending;
        let accepted = MatchStatus::Accepted;
        let rejected = MatchStatus::Rejected;

        assert!(pending.can_transition_to(&accepted));
        assert!(pending.can_transition_to(&rejected));
        assert!(rejected.can_transition_to(&accepted));

        // Idempotent (same state)
        assert!(accepted.can_transition_to(&accepted));
        assert!(rejected.can_transition_to(&rejected));

        // Invalid transitions
        assert!(!accepted.can_transition_to(&rejected));
        assert!(!accepted.can_transition_to(&pending));
        assert!(!rejected.can_transition_to(&pending));
    }

    #[test]
    fn test_terminal_state() {
        assert!(MatchStatus::Accepted.is_terminal());
        assert!(!MatchStatus::Pending.is_terminal());
        assert!(!MatchStatus::Rejected.is_terminal());
        assert!(MatchStatus::Accepted.valid_next_states().is_empty());
        assert_eq!(MatchStatus::Rejected.valid_next_states(), vec![MatchStatus::Accepted]);
    }

    #[test]
    fn test_available_actions() {
        assert_eq!(
            MatchStatus::Pending.available_actions(Actor::Participant),
            vec![MatchAction::Accept, MatchAction::Reject]
        );
        assert!(MatchStatus::Rejected.available_actions(Actor::Participant).is_empty());
        assert_eq!(
            MatchStatus::Rejected.available_actions(Actor::GroupAdmin),
            vec![MatchAction::Accept]
        );
        assert!(MatchStatus::Accepted.available_actions(Actor::GroupAdmin).is_empty());

        for status in [MatchStatus::Pending, MatchStatus::Accepted, MatchStatus::Rejected] {
            for actor in [Actor::Participant, Actor::GroupAdmin] {
                for action in status.available_actions(actor) {
                    assert!(status.can_transition_to(&action.target_status()));
                }
            }
        }
    }

    #[test]
    fn test_match_deserialization() {
        let json = r#"{
            "id": 11,
            "playedAt": "2026-03-01T18:30:00Z",
            "gameId": 2,
            "game": {"name": "Foosball"},
            "teamA": [{"id": 1, "username": "ana"}],
            "teamB": [{"id": 2, "username": "bo"}, {"id": 3, "username": "cy"}],
            "scoreA": 10,
            "scoreB": null,
            "result": "TEAM_A_WIN",
            "status": "PENDING",
            "creator": {"id": 1, "username": "ana"}
        }"#;
        let m: Match = serde_json::from_str(json).unwrap();
        assert_eq!(m.result, MatchResult::TeamAWin);
        assert_eq!(m.status, Some(MatchStatus::Pending));
        assert_eq!(m.created_by.as_ref().map(|u| u.id), Some(1));
        assert_eq!(m.team_of(3), Some(Team::B));
        assert_eq!(m.team_of(4), None);
        assert_eq!(m.game_name(), Some("Foosball"));
        assert!(!m.has_recorded_score());
    }

    #[test]
    fn test_query_pairs() {
        let query = MatchQuery::new(10);
        assert_eq!(
            query.to_query_pairs(),
            vec![("page", "1".to_string()), ("limit", "10".to_string())]
        );

        let query = MatchQuery::new(10).page(3).game(Some(7)).filter(MatchFilter::Mine);
        assert_eq!(query.page, 1);
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
                ("gameId", "7".to_string()),
                ("filter", "mine".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_meta_navigation() {
        let meta = PageMeta {
            total: 25,
            page: 1,
            limit: 10,
            total_pages: 3,
        };
        assert!(meta.has_next());
        assert!(!meta.has_previous());

        let last = PageMeta { page: 3, ..meta };
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&MatchStatus::Rejected).unwrap();
        assert_eq!(json, "\"REJECTED\"");
        let action = serde_json::to_string(&MatchAction::Accept).unwrap();
        assert_eq!(action, "\"accept\"");
    }
}
