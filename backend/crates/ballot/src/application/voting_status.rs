//! Voting Status Use Case

use std::sync::Arc;

use crate::application::config::BallotConfig;
use crate::domain::repository::{ProfileRepository, SystemConfigRepository, VoteRepository};
use crate::domain::value_object::UserId;
use crate::error::BallotResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingStatus {
    pub message: String,
    /// Permission flag of the profile
    pub has_permission: bool,
    pub has_voted: bool,
    /// Whether the ballot should be offered
    pub can_vote: bool,
}

/// Voting status use case
pub struct VotingStatusUseCase<R>
where
    R: ProfileRepository + VoteRepository + SystemConfigRepository,
{
    repo: Arc<R>,
    config: Arc<BallotConfig>,
}

impl<R> VotingStatusUseCase<R>
where
    R: ProfileRepository + VoteRepository + SystemConfigRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<BallotConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, user_id: &UserId) -> BallotResult<VotingStatus> {
        let system = self.repo.load_or_init(&self.config.default_message).await?;
        let profile = self.repo.get_or_create(user_id).await?;
        let has_voted = self.repo.exists_for_user(user_id).await?;

        Ok(VotingStatus {
            message: system.message,
            has_permission: profile.can_vote,
            has_voted,
            can_vote: profile.can_vote && !has_voted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::vote::Vote;
    use crate::domain::value_object::candidate::Candidate;
    use crate::infra::memory::MemoryBallotRepository;

    fn use_case(repo: &Arc<MemoryBallotRepository>) -> VotingStatusUseCase<MemoryBallotRepository> {
        VotingStatusUseCase::new(repo.clone(), Arc::new(BallotConfig::default()))
    }

    #[tokio::test]
    async fn test_missing_profile_is_created_without_permission() {
        let repo = Arc::new(MemoryBallotRepository::new());
        let user_id = UserId::new();

        let status = use_case(&repo).execute(&user_id).await.unwrap();

        assert_eq!(status.message, "Please cast your vote.");
        assert!(!status.can_vote);
        assert!(!status.has_voted);
        assert!(repo.find(&user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_voting_closes_after_vote() {
        let repo = Arc::new(MemoryBallotRepository::new());
        let user_id = UserId::new();
        let mut profile = repo.get_or_create(&user_id).await.unwrap();
        profile.grant();
        repo.update(&profile).await.unwrap();

        let status = use_case(&repo).execute(&user_id).await.unwrap();
        assert!(status.can_vote);

        VoteRepository::create(
            repo.as_ref(),
            &Vote::new(user_id, Candidate::new("X").unwrap()),
        )
        .await
        .unwrap();
        let status = use_case(&repo).execute(&user_id).await.unwrap();
        assert!(status.has_permission);
        assert!(status.has_voted);
        assert!(!status.can_vote);
    }
}
