//! Provision Superuser Use Case
//!
//! Ensures the administrator identity exists at startup. Running it again
//! leaves an existing account untouched (password and role included).

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{credentials::Credentials, user::User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{
    first_name::FirstName,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug)]
pub enum ProvisionOutcome {
    Created(User),
    AlreadyExists(User),
}

impl ProvisionOutcome {
    pub fn user(&self) -> &User {
        match self {
            ProvisionOutcome::Created(user) | ProvisionOutcome::AlreadyExists(user) => user,
        }
    }
}

pub struct ProvisionSuperuserUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<U, C> ProvisionSuperuserUseCase<U, C>
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

    /// The password is validated even when the account already exists, so a
    /// weak configured password is reported on every start
    pub async fn execute(&self, user_name: &str, password: String) -> AuthResult<ProvisionOutcome> {
        let user_name =
            UserName::new(user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let raw_password = RawPassword::new(password)?;

        if let Some(existing) = self.user_repo.find_by_user_name(&user_name).await? {
            if !existing.is_superuser() {
                tracing::warn!(
                    user_name = %existing.user_name,
                    "Account with the superuser name exists but is not a superuser"
                );
            }
            tracing::info!(user_name = %existing.user_name, "Superuser already exists");
            return Ok(ProvisionOutcome::AlreadyExists(existing));
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::with_role(user_name, FirstName::default(), UserRole::Superuser);
        let credentials = Credentials::new(user.user_id, password_hash);

        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credentials).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "Superuser created"
        );

        Ok(ProvisionOutcome::Created(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryAuthRepository;

    fn use_case(
        repo: &Arc<MemoryAuthRepository>,
    ) -> ProvisionSuperuserUseCase<MemoryAuthRepository, MemoryAuthRepository> {
        ProvisionSuperuserUseCase::new(
            repo.clone(),
            repo.clone(),
            Arc::new(AuthConfig::development()),
        )
    }

    #[tokio::test]
    async fn test_creates_then_reports_existing() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let uc = use_case(&repo);

        let first = uc.execute("root", "Str0ng-Admin-Pass".into()).await.unwrap();
        assert!(matches!(first, ProvisionOutcome::Created(_)));
        assert!(first.user().is_superuser());

        let second = uc.execute("root", "Other-Admin-Pass1".into()).await.unwrap();
        assert!(matches!(second, ProvisionOutcome::AlreadyExists(_)));
        assert_eq!(second.user().user_id, first.user().user_id);
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let repo = Arc::new(MemoryAuthRepository::new());
        let err = use_case(&repo)
            .execute("root", "rootword".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(
            repo.find_by_user_name(&UserName::new("root").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }
}
