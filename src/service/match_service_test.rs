#[cfg(test)]
mod tests {
    use crate::api_error::ApiError;
    use crate::draft::{MatchDraft, Outcome};
    use crate::models::*;
    use crate::service::match_service::MatchService;
    use crate::service::query_cache::QueryKey;
    use crate::service::test_support::{fresh_cache, unreachable_client};
    use chrono::Utc;

    /// Helper to create a service that cannot reach any backend
    fn create_test_service() -> MatchService {
        MatchService::new(unreachable_client(), fresh_cache(), 10)
    }

    fn ready_draft() -> MatchDraft {
        let mut draft = MatchDraft::new();
        draft.select_game(5);
        draft.add_player(1, Team::A).unwrap();
        draft.add_player(2, Team::B).unwrap();
        draft.set_outcome(Some(Outcome::TeamB));
        draft
    }

    fn sample_page() -> MatchPage {
        MatchPage {
            data: vec![Match {
                id: 1,
                played_at: Utc::now(),
                game_id: 5,
                game: None,
                team_a: vec![UserRef::new(1, "ana")],
                team_b: vec![UserRef::new(2, "bo")],
                score_a: Some(3),
                score_b: Some(0),
                result: MatchResult::TeamAWin,
                status: Some(MatchStatus::Accepted),
                created_by: None,
            }],
            meta: PageMeta {
                total: 1,
                page: 1,
                limit: 10,
                total_pages: 1,
            },
        }
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_transport() {
        let service = create_test_service();

        let mut no_game = ready_draft();
        no_game.clear_game();
        let err = service.submit_match(&no_game).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(ref m) if m == "Game is required"));

        let mut no_outcome = ready_draft();
        no_outcome.set_outcome(None);
        let err = service.submit_match(&no_outcome).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let mut empty_roster = ready_draft();
        empty_roster.remove_player(1, Team::A);
        let err = service.submit_match(&empty_roster).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft_and_cache() {
        let draft = ready_draft();
        let before = draft.clone();
        let cache = fresh_cache();
        let service = MatchService::new(unreachable_client(), cache.clone(), 10);
        cache.put(QueryKey::pending_matches(1), &Vec::<Match>::new()).await;

        let err = service.submit_match(&draft).await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkError(_)));
        assert_eq!(draft, before);
        assert_eq!(cache.len().await, 1);
        assert!(!service.is_submitting());
    }

    #[tokio::test]
    async fn test_list_served_from_cache() {
        let cache = fresh_cache();
        let service = MatchService::new(unreachable_client(), cache.clone(), 10);
        let query = service.default_query();
        let expected = sample_page();
        cache.put(QueryKey::group_matches(3, &query), &expected).await;

        let page = service.list_group_matches(3, &query).await.unwrap();
        assert_eq!(page, expected);

        // a different page is not cached and the backend is down
        let err = service
            .list_group_matches(3, &query.clone().page(2))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_pending_after_invalidation_refetches() {
        let cache = fresh_cache();
        let service = MatchService::new(unreachable_client(), cache.clone(), 10);
        cache.put(QueryKey::pending_matches(3), &Vec::<Match>::new()).await;
        assert!(service.pending_matches(3).await.unwrap().is_empty());

        cache.invalidate(&QueryKey::matches()).await;
        assert!(matches!(
            service.pending_matches(3).await,
            Err(ApiError::NetworkError(_))
        ));
    }

    #[test]
    fn test_action_validation() {
        let service = create_test_service();

        assert!(service
            .validate_action(MatchStatus::Pending, Actor::Participant, MatchAction::Accept)
            .is_ok());
        assert!(service
            .validate_action(MatchStatus::Pending, Actor::Participant, MatchAction::Reject)
            .is_ok());
        assert!(service
            .validate_action(MatchStatus::Rejected, Actor::GroupAdmin, MatchAction::Accept)
            .is_ok());

        assert!(service
            .validate_action(MatchStatus::Rejected, Actor::Participant, MatchAction::Accept)
            .is_err());
        assert!(service
            .validate_action(MatchStatus::Accepted, Actor::GroupAdmin, MatchAction::Reject)
            .is_err());
        assert!(service
            .validate_action(MatchStatus::Rejected, Actor::GroupAdmin, MatchAction::Reject)
            .is_err());
    }

    #[tokio::test]
    async fn test_invalid_action_is_local() {
        let service = create_test_service();
        let err = service
            .reject_match(9, MatchStatus::Accepted, Actor::GroupAdmin)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(ref m) if m == "Cannot reject a match that is accepted"));
    }

    #[tokio::test]
    async fn test_action_failure_leaves_status_to_backend() {
        let cache = fresh_cache();
        let service = MatchService::new(unreachable_client(), cache.clone(), 10);
        cache.put(QueryKey::pending_matches(3), &Vec::<Match>::new()).await;

        let err = service
            .accept_match(9, MatchStatus::Pending, Actor::Participant)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NetworkError(_)));
        // nothing is invalidated unless the backend confirmed the action
        assert_eq!(cache.len().await, 1);
        assert!(!service.is_acting());
    }

    #[tokio::test]
    async fn test_submit_refused_while_in_flight() {
        let cache = fresh_cache();
        let service = MatchService::new(unreachable_client(), cache.clone(), 10);
        cache.put(QueryKey::pending_matches(3), &Vec::<Match>::new()).await;

        let guard = service.submit_gate().begin().unwrap();
        assert!(service.is_submitting());
        let err = service.submit_match(&ready_draft()).await.unwrap_err();
        assert!(matches!(err, ApiError::MutationInFlight));
        assert_eq!(cache.len().await, 1);

        drop(guard);
        // released gate lets the request through to the (unreachable) backend
        let err = service.submit_match(&ready_draft()).await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_action_refused_while_in_flight() {
        let service = create_test_service();

        let _guard = service.action_gate().begin().unwrap();
        assert!(service.is_acting());
        let err = service
            .accept_match(9, MatchStatus::Pending, Actor::Participant)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MutationInFlight));
    }
}
