//! Sign In Use Case
//!
//! Authenticates a user and creates a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::open_session;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthSessionRepository, CredentialRepository, UserRepository};
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub user_name: String,
    pub password: String,
    /// Client IP (for the session row, logging only)
    pub client_ip: Option<String>,
}

#[derive(Debug)]
pub struct SignInOutput {
    /// Session token for cookie
    pub session_token: String,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, C, S> SignInUseCase<U, C, S>
where
    U: UserRepository + Sync,
    C: CredentialRepository + Sync,
    S: AuthSessionRepository + Sync,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Unknown name and wrong password are indistinguishable to the caller
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;
        let mut user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let credentials = self
            .credential_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Credentials not found".to_string()))?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;
        if !credentials
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        user.record_login();
        self.user_repo.update(&user).await?;

        let session_token = open_session(
            self.session_repo.as_ref(),
            &self.config,
            &user,
            input.client_ip,
        )
        .await?;

        tracing::info!(
            user_id = %user.user_id,
            user_role = %user.user_role,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::infra::memory::MemoryAuthRepository;

    async fn setup() -> (
        Arc<MemoryAuthRepository>,
        SignInUseCase<MemoryAuthRepository, MemoryAuthRepository, MemoryAuthRepository>,
    ) {
        let repo = Arc::new(MemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());
        SignUpUseCase::new(repo.clone(), repo.clone(), config.clone())
            .execute(SignUpInput {
                user_name: "alice".into(),
                password: "Correct-Horse-9".into(),
                first_name: "Alice".into(),
            })
            .await
            .unwrap();
        let sign_in = SignInUseCase::new(repo.clone(), repo.clone(), repo.clone(), config);
        (repo, sign_in)
    }

    fn input(name: &str, password: &str) -> SignInInput {
        SignInInput {
            user_name: name.into(),
            password: password.into(),
            client_ip: Some("127.0.0.1".into()),
        }
    }

    #[tokio::test]
    async fn test_sign_in_opens_session() {
        let (repo, sign_in) = setup().await;
        let output = sign_in
            .execute(input("alice", "Correct-Horse-9"))
            .await
            .unwrap();

        assert!(output.user.last_login_at.is_some());
        assert!(output.session_token.contains('.'));
        assert_eq!(repo.session_count().await, 1);

        let stored = repo
            .find_by_user_name(&UserName::new("alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (repo, sign_in) = setup().await;
        let err = sign_in
            .execute(input("alice", "Wrong-Horse-9"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(repo.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_user_and_case_mismatch() {
        let (_repo, sign_in) = setup().await;
        for name in ["bob", "Alice", ""] {
            let err = sign_in
                .execute(input(name, "Correct-Horse-9"))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
    }
}
