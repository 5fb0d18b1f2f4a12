//! Value Object Module

pub mod first_name;
pub mod user_name;
pub mod user_password;
pub mod user_role;

pub use kernel::id::{SessionId, UserId};
