//! Check Session Use Case
//!
//! Resolves a session cookie into the signed-in user.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::parse_token;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::SessionId;
use crate::error::{AuthError, AuthResult};

/// A valid session and the user it belongs to
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub session_id: SessionId,
    pub user: User,
}

/// Check session use case
pub struct CheckSessionUseCase<R>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> CheckSessionUseCase<R>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Validate the token and load the current user
    ///
    /// Expired sessions and sessions of deleted users are removed.
    /// The role is taken from the user row, not from the session.
    pub async fn execute(&self, session_token: &str) -> AuthResult<ActiveSession> {
        let session_id = parse_token(&self.config, session_token)?;

        let mut session = AuthSessionRepository::find_by_id(self.repo.as_ref(), &session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            AuthSessionRepository::delete(self.repo.as_ref(), &session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let Some(user) = UserRepository::find_by_id(self.repo.as_ref(), &session.user_id).await?
        else {
            AuthSessionRepository::delete(self.repo.as_ref(), &session_id).await?;
            return Err(AuthError::SessionInvalid);
        };

        // Update last activity in background
        session.touch();
        let repo = self.repo.clone();
        tokio::spawn(async move {
            if let Err(e) = AuthSessionRepository::update(repo.as_ref(), &session).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(ActiveSession { session_id, user })
    }
}
