//! Cast Vote Use Case
//!
//! Checks, in order: permission, existing vote, candidate.

use std::sync::Arc;

use crate::domain::entity::vote::Vote;
use crate::domain::repository::{ProfileRepository, VoteRepository};
use crate::domain::value_object::{
    UserId,
    candidate::{Candidate, CandidateError},
};
use crate::error::{BallotError, BallotResult};

#[derive(Debug, Clone, PartialEq)]
pub enum CastVoteOutcome {
    Recorded(Vote),
    /// No candidate was submitted; nothing happens
    Skipped,
}

/// Cast vote use case
pub struct CastVoteUseCase<R>
where
    R: ProfileRepository + VoteRepository,
{
    repo: Arc<R>,
}

impl<R> CastVoteUseCase<R>
where
    R: ProfileRepository + VoteRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        candidate: Option<&str>,
    ) -> BallotResult<CastVoteOutcome> {
        // No profile means no permission
        let can_vote = self
            .repo
            .find(user_id)
            .await?
            .is_some_and(|profile| profile.can_vote);
        if !can_vote {
            tracing::info!(user_id = %user_id, "Vote rejected: no permission");
            return Err(BallotError::VotingNotPermitted);
        }

        if self.repo.exists_for_user(user_id).await? {
            tracing::info!(user_id = %user_id, "Vote rejected: already voted");
            return Err(BallotError::AlreadyVoted);
        }

        let candidate = match Candidate::new(candidate.unwrap_or_default()) {
            Ok(candidate) => candidate,
            Err(CandidateError::Empty) => return Ok(CastVoteOutcome::Skipped),
            Err(e) => return Err(BallotError::InvalidCandidate(e.to_string())),
        };

        let vote = Vote::new(*user_id, candidate);
        // A concurrent second vote loses here with AlreadyVoted
        self.repo.create(&vote).await?;

        tracing::info!(
            user_id = %user_id,
            vote_id = %vote.vote_id,
            "Vote recorded"
        );

        Ok(CastVoteOutcome::Recorded(vote))
    }
}
