//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    profile::Profile, system_config::SystemConfig, tally::CandidateTally, vote::Vote,
};
pub use repository::{ProfileRepository, SystemConfigRepository, VoteRepository};
