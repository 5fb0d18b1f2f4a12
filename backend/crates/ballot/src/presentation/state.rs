//! Shared handler state

use std::sync::Arc;

use auth::AuthConfig;
use auth::domain::repository::{AuthSessionRepository, CredentialRepository, UserRepository};

use crate::application::config::BallotConfig;
use crate::domain::repository::{ProfileRepository, SystemConfigRepository, VoteRepository};

/// Everything the handlers need from the identity store
pub trait AuthStore:
    UserRepository + CredentialRepository + AuthSessionRepository + Send + Sync + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository + CredentialRepository + AuthSessionRepository + Send + Sync + 'static
{
}

/// Everything the handlers need from the ballot store
pub trait BallotStore:
    ProfileRepository + VoteRepository + SystemConfigRepository + Send + Sync + 'static
{
}

impl<T> BallotStore for T where
    T: ProfileRepository + VoteRepository + SystemConfigRepository + Send + Sync + 'static
{
}

pub struct BallotAppState<A, B> {
    pub auth_repo: Arc<A>,
    pub ballot_repo: Arc<B>,
    pub auth_config: Arc<AuthConfig>,
    pub config: Arc<BallotConfig>,
}

impl<A, B> BallotAppState<A, B> {
    pub fn new(
        auth_repo: Arc<A>,
        ballot_repo: Arc<B>,
        auth_config: Arc<AuthConfig>,
        config: Arc<BallotConfig>,
    ) -> Self {
        Self {
            auth_repo,
            ballot_repo,
            auth_config,
            config,
        }
    }
}

impl<A, B> Clone for BallotAppState<A, B> {
    fn clone(&self) -> Self {
        Self {
            auth_repo: self.auth_repo.clone(),
            ballot_repo: self.ballot_repo.clone(),
            auth_config: self.auth_config.clone(),
            config: self.config.clone(),
        }
    }
}
