//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.

use crate::domain::entity::{auth_session::AuthSession, credentials::Credentials, user::User};
use crate::domain::value_object::{SessionId, UserId, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user; a taken user name yields `AuthError::UserNameTaken`
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Exact (case-sensitive) lookup
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Case-insensitive substring match on user name or first name,
    /// ordered by user name. An empty keyword matches everyone.
    async fn search(&self, keyword: &str) -> AuthResult<Vec<User>>;
}

/// Credentials repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    async fn create(&self, credentials: &Credentials) -> AuthResult<()>;

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<AuthSession>>;

    /// Update session (last activity)
    async fn update(&self, session: &AuthSession) -> AuthResult<()>;

    async fn delete(&self, session_id: &SessionId) -> AuthResult<()>;

    /// Delete expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
