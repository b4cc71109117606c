use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::{UserId, UserRef};

pub type GroupId = u64;
pub type GameId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Admin,
    Member,
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Admin => write!(f, "Admin"),
            MemberRole::Member => write!(f, "Member"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user: UserRef,
    pub role: MemberRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
}

/// Full group as loaded by the group view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub invite_code: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub games: Vec<Game>,
}

/// Row of the "my groups" list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub game_count: u32,
    #[serde(default)]
    pub match_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: GroupId,
    pub name: String,
}

impl Group {
    pub fn role_of(&self, user_id: UserId) -> Option<MemberRole> {
        self.members
            .iter()
            .find(|m| m.user.id == user_id)
            .map(|m| m.role)
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.role_of(user_id) == Some(MemberRole::Admin)
    }

    /// Admins may change any other member's role, never their own.
    pub fn can_manage(&self, viewer: UserId, target: UserId) -> bool {
        viewer != target && self.is_admin(viewer)
    }

    /// Admins first, then alphabetical by username.
    pub fn sorted_members(&self) -> Vec<&GroupMember> {
        let mut members: Vec<&GroupMember> = self.members.iter().collect();
        members.sort_by(|a, b| {
            let a_admin = a.role == MemberRole::Admin;
            let b_admin = b.role == MemberRole::Admin;
            b_admin
                .cmp(&a_admin)
                .then_with(|| a.user.username.cmp(&b.user.username))
        });
        members
    }

    pub fn users(&self) -> Vec<UserRef> {
        self.members.iter().map(|m| m.user.clone()).collect()
    }

    pub fn game(&self, game_id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == game_id)
    }
}

// ===== API DTOs =====

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct CreateGroupDTO {
    #[validate(length(min = 1, max = 64, message = "Group name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinGroupDTO {
    #[validate(length(min = 1, message = "Invite code is required"))]
    pub invite_code: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct CreateGameDTO {
    #[validate(length(min = 1, max = 64, message = "Game name is required"))]
    pub name: String,
}

/// Wire body of `POST /groups/game`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateGameBody<'a> {
    pub group_id: GroupId,
    pub name: &'a str,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateRoleDTO {
    pub role: MemberRole,
}
