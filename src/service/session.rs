use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};
use validator::Validate;

use crate::api_error::ApiError;
use crate::models::{CurrentUser, LoginDTO, RegisterDTO};
use crate::service::api_client::ApiClient;
use crate::service::query_cache::{QueryCache, QueryKey};

/// Current user lookups stay fresh for ten minutes.
const AUTH_STALE_AFTER: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// `init` has not run yet.
    Unknown,
    Authenticated(CurrentUser),
    Anonymous,
    /// Signed out during this run.
    Cleared,
}

/// Authentication session shared by the services.
pub struct Session {
    client: ApiClient,
    cache: Arc<QueryCache>,
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new(client: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self {
            client,
            cache,
            state: RwLock::new(SessionState::Unknown),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<CurrentUser> {
        match &*self.state.read().await {
            SessionState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// Resolve the session from the backend. Any failure means anonymous.
    pub async fn init(&self) -> SessionState {
        let client = self.client.clone();
        let result = self
            .cache
            .fetch_with_ttl(QueryKey::auth_user(), AUTH_STALE_AFTER, || async move {
                client.get::<CurrentUser>("/auth/me", &[]).await
            })
            .await;

        let state = match result {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "Session established");
                SessionState::Authenticated(user)
            }
            Err(e) => {
                if !e.is_auth() {
                    warn!(error = %e, "Could not resolve current user");
                }
                SessionState::Anonymous
            }
        };

        *self.state.write().await = state.clone();
        state
    }

    pub async fn login(&self, dto: LoginDTO) -> Result<CurrentUser, ApiError> {
        dto.validate()?;

        self.client.post_empty("/auth/login", Some(&dto)).await?;
        self.cache.invalidate(&QueryKey::auth_user()).await;

        match self.init().await {
            SessionState::Authenticated(user) => Ok(user),
            _ => Err(ApiError::Unauthorized),
        }
    }

    pub async fn register(&self, dto: RegisterDTO) -> Result<(), ApiError> {
        dto.validate()?;

        self.client.post_empty("/auth/register", Some(&dto)).await?;
        info!(username = %dto.username, "Account created");
        Ok(())
    }

    /// Local state is cleared even when the backend call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.client.post_empty::<()>("/auth/logout", None).await {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }

        // every cached query belongs to the signed-out user
        self.cache.clear().await;
        *self.state.write().await = SessionState::Cleared;
        info!("Session cleared");
    }

    /// Gate for views that need a signed-in user.
    pub async fn require_user(&self) -> Result<CurrentUser, ApiError> {
        self.current_user().await.ok_or(ApiError::Unauthorized)
    }
}
