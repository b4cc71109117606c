use std::sync::Arc;
use tracing::{error, info};

use crate::api_error::ApiError;
use crate::draft::MatchDraft;
use crate::models::{Actor, GroupId, Match, MatchAction, MatchId, MatchPage, MatchQuery, MatchStatus};
use crate::service::api_client::ApiClient;
use crate::service::mutation::MutationGate;
use crate::service::query_cache::{QueryCache, QueryKey};

/// Match lists, match recording and the pending-review workflow.
pub struct MatchService {
    client: ApiClient,
    cache: Arc<QueryCache>,
    page_size: u32,
    submit_gate: MutationGate,
    action_gate: MutationGate,
}

impl MatchService {
    pub fn new(client: ApiClient, cache: Arc<QueryCache>, page_size: u32) -> Self {
        Self {
            client,
            cache,
            page_size,
            submit_gate: MutationGate::new(),
            action_gate: MutationGate::new(),
        }
    }

    /// First page of the group history using the configured page size.
    pub fn default_query(&self) -> MatchQuery {
        MatchQuery::new(self.page_size)
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_gate.is_pending()
    }

    pub fn is_acting(&self) -> bool {
        self.action_gate.is_pending()
    }

    #[cfg(test)]
    pub(crate) fn submit_gate(&self) -> &MutationGate {
        &self.submit_gate
    }

    #[cfg(test)]
    pub(crate) fn action_gate(&self) -> &MutationGate {
        &self.action_gate
    }

    // =============================================================================
    // QUERIES
    // =============================================================================

    pub async fn list_group_matches(
        &self,
        group_id: GroupId,
        query: &MatchQuery,
    ) -> Result<MatchPage, ApiError> {
        let path = format!("/groups/{}/matches", group_id);
        let pairs = query.to_query_pairs();
        let client = &self.client;

        self.cache
            .fetch(QueryKey::group_matches(group_id, query), || async move {
                client.query::<MatchPage>(&path, &pairs).await
            })
            .await
    }

    pub async fn pending_matches(&self, group_id: GroupId) -> Result<Vec<Match>, ApiError> {
        let path = format!("/groups/{}/matches/pending", group_id);
        let client = &self.client;

        self.cache
            .fetch(QueryKey::pending_matches(group_id), || async move {
                client.query::<Vec<Match>>(&path, &[]).await
            })
            .await
    }

    // =============================================================================
    // SUBMIT MATCH
    // =============================================================================

    /// Record a match. The draft is only borrowed, so a failed submit leaves
    /// it intact for another attempt.
    pub async fn submit_match(&self, draft: &MatchDraft) -> Result<(), ApiError> {
        draft.validate()?;
        let payload = draft.to_payload()?;

        let _guard = self.submit_gate.begin()?;

        info!(
            game_id = payload.game_id,
            result = ?payload.result,
            team_a = payload.team_a.member_ids.len(),
            team_b = payload.team_b.member_ids.len(),
            "Submitting match"
        );

        self.client
            .post_empty("/matches", Some(&payload))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to submit match");
                e
            })?;

        self.cache.invalidate(&QueryKey::matches()).await;
        self.cache.invalidate(&QueryKey::groups()).await;
        self.cache.invalidate(&QueryKey::my_groups()).await;

        info!(game_id = payload.game_id, "Match submitted");
        Ok(())
    }

    // =============================================================================
    // ACCEPT / REJECT
    // =============================================================================

    /// Check an action against the status the viewer last saw.
    pub fn validate_action(
        &self,
        status: MatchStatus,
        actor: Actor,
        action: MatchAction,
    ) -> Result<(), ApiError> {
        if !status.available_actions(actor).contains(&action) {
            return Err(ApiError::validation(format!(
                "Cannot {} a match that is {}",
                action.path_segment(),
                status
            )));
        }
        Ok(())
    }

    /// Issue one accept/reject call. The new status is never written
    /// locally; the match lists are invalidated and refetched instead.
    pub async fn act_on_match(
        &self,
        match_id: MatchId,
        status: MatchStatus,
        actor: Actor,
        action: MatchAction,
    ) -> Result<(), ApiError> {
        self.validate_action(status, actor, action)?;

        let _guard = self.action_gate.begin()?;

        info!(
            match_id = match_id,
            from_status = %status,
            action = action.path_segment(),
            actor = ?actor,
            "Acting on match"
        );

        let path = format!("/matches/{}/{}", match_id, action.path_segment());
        self.client
            .post_empty::<()>(&path, None)
            .await
            .map_err(|e| {
                error!(match_id = match_id, error = %e, "Match action failed");
                e
            })?;

        self.cache.invalidate(&QueryKey::matches()).await;
        self.cache.invalidate(&QueryKey::stats()).await;
        Ok(())
    }

    pub async fn accept_match(
        &self,
        match_id: MatchId,
        status: MatchStatus,
        actor: Actor,
    ) -> Result<(), ApiError> {
        self.act_on_match(match_id, status, actor, MatchAction::Accept).await
    }

    pub async fn reject_match(
        &self,
        match_id: MatchId,
        status: MatchStatus,
        actor: Actor,
    ) -> Result<(), ApiError> {
        self.act_on_match(match_id, status, actor, MatchAction::Reject).await
    }
}
