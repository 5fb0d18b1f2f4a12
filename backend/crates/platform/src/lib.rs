//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the voting service:
//! - Fixed-window rate limiting with an injectable counter store
//! - Flash notices carried across redirects
//! - Client identification and cookie handling
//! - Password hashing (Argon2id) and signed tokens (HMAC-SHA256)

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod flash;
pub mod password;
pub mod rate_limit;
