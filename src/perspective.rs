//! Personal outcome of a match as seen by one viewer.
//!
//! Everything here is a pure derivation over a [`Match`] and a viewer id:
//! no lookups, no errors. A viewer on neither roster is a spectator.

use serde::{Deserialize, Serialize};

use crate::models::{Match, MatchResult, Team, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonalResult {
    Victory,
    Defeat,
    Draw,
    Spectator,
}

impl PersonalResult {
    pub fn label(&self) -> &'static str {
        match self {
            PersonalResult::Victory => "Victory",
            PersonalResult::Defeat => "Defeat",
            PersonalResult::Draw => "Draw",
            PersonalResult::Spectator => "Spectator",
        }
    }

    /// Button text offered when reviewing a pending match.
    pub fn accept_label(&self) -> &'static str {
        match self {
            PersonalResult::Victory => "Accept Victory",
            PersonalResult::Defeat => "Accept Defeat",
            PersonalResult::Draw => "Accept Draw",
            PersonalResult::Spectator => "Confirm Result",
        }
    }
}

/// Which roster renders on which side. Winners go left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySide {
    pub left: Team,
    pub right: Team,
    pub is_draw: bool,
}

impl DisplaySide {
    pub fn for_result(result: MatchResult) -> Self {
        let left = match result {
            MatchResult::TeamBWin => Team::B,
            MatchResult::TeamAWin | MatchResult::Draw => Team::A,
        };
        Self {
            left,
            right: left.other(),
            is_draw: result == MatchResult::Draw,
        }
    }

    pub fn left_label(&self) -> &'static str {
        if self.is_draw {
            self.left.label()
        } else {
            "Winners"
        }
    }

    pub fn right_label(&self) -> &'static str {
        if self.is_draw {
            self.right.label()
        } else {
            "Losers"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perspective {
    pub result: PersonalResult,
    pub display: DisplaySide,
}

pub fn personal_result(m: &Match, viewer: UserId) -> PersonalResult {
    let in_team_a = m.team_a.iter().any(|u| u.id == viewer);
    let in_team_b = m.team_b.iter().any(|u| u.id == viewer);

    if !in_team_a && !in_team_b {
        PersonalResult::Spectator
    } else if m.result == MatchResult::Draw {
        PersonalResult::Draw
    } else if (in_team_a && m.result != MatchResult::TeamBWin)
        || (in_team_b && m.result == MatchResult::TeamBWin)
    {
        PersonalResult::Victory
    } else {
        PersonalResult::Defeat
    }
}

pub fn derive_perspective(m: &Match, viewer: UserId) -> Perspective {
    Perspective {
        result: personal_result(m, viewer),
        display: DisplaySide::for_result(m.result),
    }
}

/// Text of the score box between the two rosters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreLine {
    Score { left: u32, right: u32 },
    Versus,
    Draw,
}

impl ScoreLine {
    pub fn for_match(m: &Match) -> Self {
        let display = DisplaySide::for_result(m.result);
        match (m.score(display.left), m.score(display.right)) {
            (Some(left), Some(right)) if m.has_recorded_score() => ScoreLine::Score { left, right },
            _ if display.is_draw => ScoreLine::Draw,
            _ => ScoreLine::Versus,
        }
    }
}

impl std::fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreLine::Score { left, right } => write!(f, "{} - {}", left, right),
            ScoreLine::Versus => write!(f, "VS"),
            ScoreLine::Draw => write!(f, "DRAW"),
        }
    }
}
