//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.

use crate::domain::entity::{
    profile::Profile, system_config::SystemConfig, tally::CandidateTally, vote::Vote,
};
use crate::domain::value_object::UserId;
use crate::error::BallotResult;

/// Profile repository trait
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    async fn find(&self, user_id: &UserId) -> BallotResult<Option<Profile>>;

    /// Existing profile, or a freshly stored one with `can_vote = false`
    async fn get_or_create(&self, user_id: &UserId) -> BallotResult<Profile>;

    async fn update(&self, profile: &Profile) -> BallotResult<()>;

    /// Set `can_vote = false` everywhere, returning how many profiles changed
    async fn revoke_all(&self) -> BallotResult<u64>;
}

/// Vote repository trait
#[trait_variant::make(VoteRepository: Send)]
pub trait LocalVoteRepository {
    async fn exists_for_user(&self, user_id: &UserId) -> BallotResult<bool>;

    /// Store a vote; an existing vote for the user yields `BallotError::AlreadyVoted`
    async fn create(&self, vote: &Vote) -> BallotResult<()>;

    async fn delete_for_user(&self, user_id: &UserId) -> BallotResult<u64>;

    async fn delete_all(&self) -> BallotResult<u64>;

    /// Votes grouped by candidate, sorted with [`sort_tally`](crate::domain::entity::tally::sort_tally) order
    async fn tally(&self) -> BallotResult<Vec<CandidateTally>>;
}

/// System config repository trait
#[trait_variant::make(SystemConfigRepository: Send)]
pub trait LocalSystemConfigRepository {
    /// The singleton row, created with `default_message` when absent
    async fn load_or_init(&self, default_message: &str) -> BallotResult<SystemConfig>;

    /// Insert or overwrite the singleton row
    async fn save(&self, config: &SystemConfig) -> BallotResult<()>;
}
