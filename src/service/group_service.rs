use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

use crate::api_error::ApiError;
use crate::models::*;
use crate::service::api_client::ApiClient;
use crate::service::mutation::MutationGate;
use crate::service::query_cache::{QueryCache, QueryKey};

/// Groups, their games and members, and per-game statistics.
pub struct GroupService {
    client: ApiClient,
    cache: Arc<QueryCache>,
    role_gate: MutationGate,
}

impl GroupService {
    pub fn new(client: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self {
            client,
            cache,
            role_gate: MutationGate::new(),
        }
    }

    pub fn is_updating_role(&self) -> bool {
        self.role_gate.is_pending()
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupSummary>, ApiError> {
        let client = &self.client;
        self.cache
            .fetch(QueryKey::my_groups(), || async move {
                client.query::<Vec<GroupSummary>>("/groups", &[]).await
            })
            .await
    }

    pub async fn get_group(&self, group_id: GroupId) -> Result<Group, ApiError> {
        let client = &self.client;
        let path = format!("/groups/{}", group_id);
        self.cache
            .fetch(QueryKey::group(group_id), || async move {
                client.query::<Group>(&path, &[]).await
            })
            .await
    }

    pub async fn create_group(&self, dto: CreateGroupDTO) -> Result<GroupRef, ApiError> {
        dto.validate()?;

        let group: GroupRef = self.client.post("/groups", &dto).await.map_err(|e| {
            error!(name = %dto.name, error = %e, "Failed to create group");
            e
        })?;

        self.cache.invalidate(&QueryKey::my_groups()).await;
        info!(group_id = group.id, name = %group.name, "Group created");
        Ok(group)
    }

    pub async fn join_group(&self, dto: JoinGroupDTO) -> Result<(), ApiError> {
        dto.validate()?;

        self.client.post_empty("/groups/join", Some(&dto)).await?;

        self.cache.invalidate(&QueryKey::my_groups()).await;
        info!("Joined group with invite code");
        Ok(())
    }

    pub async fn create_game(&self, group_id: GroupId, dto: CreateGameDTO) -> Result<(), ApiError> {
        dto.validate()?;

        let body = CreateGameBody {
            group_id,
            name: &dto.name,
        };
        self.client.post_empty("/groups/game", Some(&body)).await?;

        self.cache.invalidate(&QueryKey::group(group_id)).await;
        info!(group_id = group_id, name = %dto.name, "Game created");
        Ok(())
    }

    /// Change another member's role. Only admins may do so, and never for
    /// themselves; both are checked before anything is sent.
    pub async fn update_member_role(
        &self,
        group: &Group,
        viewer: UserId,
        user_id: UserId,
        role: MemberRole,
    ) -> Result<(), ApiError> {
        if viewer == user_id {
            return Err(ApiError::validation("You cannot change your own role"));
        }
        if !group.can_manage(viewer, user_id) {
            return Err(ApiError::validation("Admin access required"));
        }

        let _guard = self.role_gate.begin()?;

        let path = format!("/groups/{}/members/{}", group.id, user_id);
        self.client
            .patch_empty(&path, &UpdateRoleDTO { role })
            .await
            .map_err(|e| {
                error!(group_id = group.id, user_id = user_id, error = %e, "Role update failed");
                e
            })?;

        self.cache.invalidate(&QueryKey::groups()).await;
        info!(group_id = group.id, user_id = user_id, role = %role, "Member role updated");
        Ok(())
    }

    pub async fn game_stats(&self, group_id: GroupId, game_id: GameId) -> Result<GameStats, ApiError> {
        let client = &self.client;
        let path = format!("/groups/{}/stats", group_id);
        let query = [("gameId", game_id.to_string())];
        self.cache
            .fetch(QueryKey::game_stats(group_id, game_id), || async move {
                client.query::<GameStats>(&path, &query).await
            })
            .await
    }

    pub async fn my_game_stats(
        &self,
        group_id: GroupId,
        game_id: GameId,
    ) -> Result<MyGameStats, ApiError> {
        let client = &self.client;
        let path = format!("/groups/{}/stats/me", group_id);
        let query = [("gameId", game_id.to_string())];
        self.cache
            .fetch(QueryKey::my_game_stats(group_id, game_id), || async move {
                client.query::<MyGameStats>(&path, &query).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{fresh_cache, unreachable_client};

    fn service() -> GroupService {
        GroupService::new(unreachable_client(), fresh_cache())
    }

    fn group() -> Group {
        Group {
            id: 3,
            name: "Office".to_string(),
            invite_code: "PING".to_string(),
            members: vec![
                GroupMember {
                    user: UserRef::new(1, "ana"),
                    role: MemberRole::Admin,
                },
                GroupMember {
                    user: UserRef::new(2, "bo"),
                    role: MemberRole::Member,
                },
            ],
            games: vec![],
        }
    }

    #[tokio::test]
    async fn test_role_update_requires_admin() {
        let service = service();
        let err = service
            .update_member_role(&group(), 2, 1, MemberRole::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(ref m) if m == "Admin access required"));
    }

    #[tokio::test]
    async fn test_role_update_refuses_self() {
        let service = service();
        let err = service
            .update_member_role(&group(), 1, 1, MemberRole::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_role_update_dispatches_for_admin() {
        let service = service();
        let err = service
            .update_member_role(&group(), 1, 2, MemberRole::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NetworkError(_)));
        assert!(!service.is_updating_role());
    }

    #[tokio::test]
    async fn test_dto_validation_is_local() {
        let service = service();
        let err = service
            .create_group(CreateGroupDTO { name: String::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let err = service
            .create_game(3, CreateGameDTO { name: String::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_group_read_through_cache() {
        let cache = fresh_cache();
        let service = GroupService::new(unreachable_client(), cache.clone());
        cache.put(QueryKey::group(3), &group()).await;

        assert_eq!(service.get_group(3).await.unwrap(), group());
        assert!(service.get_group(4).await.is_err());
    }
}
