//! Sign Up Use Case
//!
//! Creates a new voter account.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{credentials::Credentials, user::User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{
    first_name::FirstName,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct SignUpInput {
    pub user_name: String,
    pub password: String,
    pub first_name: String,
}

/// Sign up use case
pub struct SignUpUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<U, C> SignUpUseCase<U, C>
where
    U: UserRepository + Sync,
    C: CredentialRepository + Sync,
{
    pub fn new(user_repo: Arc<U>, credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<User> {
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let first_name = FirstName::new(&input.first_name)?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = User::new(user_name, first_name);
        let credentials = Credentials::new(user.user_id, password_hash);

        // A concurrent sign-up with the same name loses here with UserNameTaken
        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credentials).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed up"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryAuthRepository;

    fn use_case(
        repo: &Arc<MemoryAuthRepository>,
    ) -> SignUpUseCase<MemoryAuthRepository, MemoryAuthRepository> {
        SignUpUseCase::new(
            repo.clone(),
            repo.clone(),
            Arc::new(AuthConfig::development()),
        )
    }

    fn input(name: &str, password: &str) -> SignUpInput {
        SignUpInput {
            user_name: name.to_string(),
            password: password.to_string(),
            first_name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_voter_with_credentials() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let user = use_case(&repo)
            .execute(input("alice", "Correct-Horse-9"))
            .await
            .unwrap();

        assert!(!user.is_superuser());
        assert_eq!(user.first_name.as_str(), "Alice");
        let stored = CredentialRepository::find_by_user_id(repo.as_ref(), &user.user_id)
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_user_name() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let uc = use_case(&repo);
        uc.execute(input("alice", "Correct-Horse-9")).await.unwrap();

        let err = uc
            .execute(input("alice", "Another-Pass-7"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNameTaken));
    }

    #[tokio::test]
    async fn test_user_names_are_case_sensitive() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let uc = use_case(&repo);
        uc.execute(input("alice", "Correct-Horse-9")).await.unwrap();
        assert!(uc.execute(input("Alice", "Correct-Horse-9")).await.is_ok());
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let uc = use_case(&repo);

        let err = uc.execute(input("", "Correct-Horse-9")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = uc.execute(input("bob", "short")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        assert!(
            repo.find_by_user_name(&UserName::new("bob").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }
}
