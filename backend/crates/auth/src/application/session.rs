//! Session tokens
//!
//! Cookie value is `{session_id}.{base64url(HMAC-SHA256(session_id))}`.

use platform::crypto::{sign_token, verify_token};

use crate::application::config::AuthConfig;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::AuthSessionRepository;
use crate::domain::value_object::SessionId;
use crate::error::{AuthError, AuthResult};

pub fn issue_token(config: &AuthConfig, session_id: &SessionId) -> String {
    sign_token(&config.session_secret, &session_id.to_string())
}

/// Verify the signature and recover the session id
pub fn parse_token(config: &AuthConfig, token: &str) -> AuthResult<SessionId> {
    let payload = verify_token(&config.session_secret, token).ok_or(AuthError::SessionInvalid)?;
    SessionId::parse_str(payload).ok_or(AuthError::SessionInvalid)
}

/// Persist a new session for `user` and return its cookie token
pub async fn open_session<S>(
    repo: &S,
    config: &AuthConfig,
    user: &User,
    client_ip: Option<String>,
) -> AuthResult<String>
where
    S: AuthSessionRepository + Sync,
{
    let session = AuthSession::new(
        user.user_id,
        user.user_role,
        client_ip,
        config.session_ttl_chrono(),
    );
    repo.create(&session).await?;

    tracing::info!(
        user_id = %user.user_id,
        session_id = %session.session_id,
        "Session opened"
    );

    Ok(issue_token(config, &session.session_id))
}
