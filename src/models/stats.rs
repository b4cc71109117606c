use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_matches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub username: String,
    pub rank: u32,
    pub elo: i32,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    pub win_rate: f64,
}

impl LeaderboardEntry {
    /// Medal for the podium, `#n` for everyone else.
    pub fn rank_badge(&self) -> String {
        match self.rank {
            1 => "🥇".to_string(),
            2 => "🥈".to_string(),
            3 => "🥉".to_string(),
            n => format!("#{}", n),
        }
    }

    pub fn record(&self) -> String {
        format!("{} - {} - {}", self.wins, self.losses, self.draws)
    }
}

/// Leaderboard of one game inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub overview: StatsOverview,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl GameStats {
    pub fn has_matches(&self) -> bool {
        self.overview.total_matches > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    L,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakType {
    Win,
    Loss,
    Draw,
}

impl StreakType {
    pub fn label(&self) -> &'static str {
        match self {
            StreakType::Win => "Wins",
            StreakType::Loss => "Losses",
            StreakType::Draw => "Draws",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    #[serde(rename = "type", default)]
    pub kind: Option<StreakType>,
    #[serde(default)]
    pub count: u32,
}

impl Streak {
    pub fn describe(&self) -> Option<String> {
        self.kind.map(|kind| format!("{} {}", self.count, kind.label()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rival {
    pub username: String,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rivals {
    #[serde(default)]
    pub nemesis: Option<Rival>,
    #[serde(default)]
    pub bunny: Option<Rival>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub elo: i32,
    pub win_rate: f64,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    pub total_played: u32,
}

/// The viewer's own statistics for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyGameStats {
    pub has_played: bool,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub stats: Option<PlayerStats>,
    #[serde(default)]
    pub form: Vec<FormResult>,
    #[serde(default)]
    pub streak: Option<Streak>,
    #[serde(default)]
    pub rivals: Rivals,
}
