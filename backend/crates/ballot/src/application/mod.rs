//! Application Layer
//!
//! Use cases and application services.

pub mod admin_actions;
pub mod admin_dashboard;
pub mod cast_vote;
pub mod config;
pub mod register_voter;
pub mod voting_status;

// Re-exports
pub use admin_actions::{AdminAction, AdminActionsUseCase};
pub use admin_dashboard::{AdminDashboard, AdminDashboardUseCase, DashboardQuery, UserSummary};
pub use cast_vote::{CastVoteOutcome, CastVoteUseCase};
pub use config::BallotConfig;
pub use register_voter::{RegisterVoterInput, RegisterVoterOutput, RegisterVoterUseCase};
pub use voting_status::{VotingStatus, VotingStatusUseCase};
