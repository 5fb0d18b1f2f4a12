//! Register Voter Use Case
//!
//! Sign-up followed by profile creation and an immediate session.

use std::sync::Arc;

use auth::AuthConfig;
use auth::application::session::open_session;
use auth::application::{SignUpInput, SignUpUseCase};
use auth::domain::User;
use auth::domain::repository::{AuthSessionRepository, CredentialRepository, UserRepository};

use crate::domain::repository::ProfileRepository;
use crate::error::BallotResult;

pub struct RegisterVoterInput {
    pub user_name: String,
    pub password: String,
    pub first_name: String,
    pub client_ip: Option<String>,
}

#[derive(Debug)]
pub struct RegisterVoterOutput {
    pub user: User,
    /// Session token for cookie
    pub session_token: String,
}

/// Register voter use case
pub struct RegisterVoterUseCase<A, P>
where
    A: UserRepository + CredentialRepository + AuthSessionRepository,
    P: ProfileRepository,
{
    auth_repo: Arc<A>,
    profile_repo: Arc<P>,
    auth_config: Arc<AuthConfig>,
}

impl<A, P> RegisterVoterUseCase<A, P>
where
    A: UserRepository + CredentialRepository + AuthSessionRepository + Sync,
    P: ProfileRepository + Sync,
{
    pub fn new(auth_repo: Arc<A>, profile_repo: Arc<P>, auth_config: Arc<AuthConfig>) -> Self {
        Self {
            auth_repo,
            profile_repo,
            auth_config,
        }
    }

    pub async fn execute(&self, input: RegisterVoterInput) -> BallotResult<RegisterVoterOutput> {
        let sign_up = SignUpUseCase::new(
            self.auth_repo.clone(),
            self.auth_repo.clone(),
            self.auth_config.clone(),
        );
        let user = sign_up
            .execute(SignUpInput {
                user_name: input.user_name,
                password: input.password,
                first_name: input.first_name,
            })
            .await?;

        let profile = self.profile_repo.get_or_create(&user.user_id).await?;

        let session_token = open_session(
            self.auth_repo.as_ref(),
            &self.auth_config,
            &user,
            input.client_ip,
        )
        .await?;

        tracing::info!(
            user_id = %user.user_id,
            can_vote = profile.can_vote,
            "Voter registered"
        );

        Ok(RegisterVoterOutput {
            user,
            session_token,
        })
    }
}
