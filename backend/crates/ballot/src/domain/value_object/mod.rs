//! Value Object Module

pub mod candidate;

pub use kernel::id::{UserId, VoteId};
