//! In-Memory Repository Implementation
//!
//! Same contracts as the PostgreSQL repository, for tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entity::{auth_session::AuthSession, credentials::Credentials, user::User};
use crate::domain::repository::{AuthSessionRepository, CredentialRepository, UserRepository};
use crate::domain::value_object::{SessionId, UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    credentials: HashMap<UserId, Credentials>,
    sessions: HashMap<SessionId, AuthSession>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAuthRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.user_name == user.user_name) {
            return Err(AuthError::UserNameTaken);
        }
        tables.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.tables.read().await.users.get(user_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| &u.user_name == user_name)
            .cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| &u.user_name == user_name))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.users.get_mut(&user.user_id) {
            *existing = user.clone();
        }
        Ok(())
    }

    async fn search(&self, keyword: &str) -> AuthResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.matches_keyword(keyword))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.user_name.as_str().cmp(b.user_name.as_str()));
        Ok(users)
    }
}

impl CredentialRepository for MemoryAuthRepository {
    async fn create(&self, credentials: &Credentials) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .credentials
            .insert(credentials.user_id, credentials.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>> {
        Ok(self.tables.read().await.credentials.get(user_id).cloned())
    }
}

impl AuthSessionRepository for MemoryAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        tables.sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<AuthSession>> {
        Ok(self.tables.read().await.sessions.get(session_id).cloned())
    }

    async fn update(&self, session: &AuthSession) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.sessions.get_mut(&session.session_id) {
            existing.expires_at_ms = session.expires_at_ms;
            existing.last_activity_at = session.last_activity_at;
        }
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> AuthResult<()> {
        self.tables.write().await.sessions.remove(session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        Ok((before - tables.sessions.len()) as u64)
    }
}
