//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - Session middleware and access control
//!
//! ## Features
//! - Sign-up and login with user name + password
//! - Server-side sessions referenced by an HMAC-signed cookie token
//! - Two roles: voter and superuser
//! - Idempotent provisioning of the administrator identity
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (optional pepper)
//! - Session tokens are `{session_id}.{HMAC-SHA256}`; forged or expired tokens are ignored

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::MemoryAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{
    AuthMiddlewareState, AuthStatus, CurrentUser, load_session, require_superuser, require_user,
};
