//! Admin Actions Use Case
//!
//! Write side of the admin surface. Targets without a profile are ignored.

use std::sync::Arc;

use platform::flash::Notice;

use crate::application::config::BallotConfig;
use crate::domain::repository::{ProfileRepository, SystemConfigRepository, VoteRepository};
use crate::domain::value_object::UserId;
use crate::error::BallotResult;

pub const NOTICE_MESSAGE_UPDATED: &str = "The voting message has been updated.";
pub const NOTICE_PERMISSION_GRANTED: &str = "Voting permission granted.";
pub const NOTICE_PERMISSION_REVOKED: &str = "Voting permission revoked.";
pub const NOTICE_VOTE_VOIDED: &str = "The vote has been voided.";
pub const NOTICE_VOTES_RESET: &str = "All votes have been reset.";
pub const NOTICE_PERMISSIONS_RESET: &str = "All voting permissions have been revoked.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    UpdateMessage(String),
    GrantPermission(UserId),
    RevokePermission(UserId),
    VoidVote(UserId),
    ResetVotes,
    ResetPermissions,
}

/// Admin actions use case
pub struct AdminActionsUseCase<R>
where
    R: ProfileRepository + VoteRepository + SystemConfigRepository,
{
    repo: Arc<R>,
    config: Arc<BallotConfig>,
}

impl<R> AdminActionsUseCase<R>
where
    R: ProfileRepository + VoteRepository + SystemConfigRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<BallotConfig>) -> Self {
        Self { repo, config }
    }

    /// Apply `action`; `None` when it had nothing to act on
    pub async fn execute(&self, action: AdminAction) -> BallotResult<Option<Notice>> {
        match action {
            AdminAction::UpdateMessage(message) => {
                let mut system = self.repo.load_or_init(&self.config.default_message).await?;
                system.set_message(message);
                self.repo.save(&system).await?;
                tracing::info!("Voting message updated");
                Ok(Some(Notice::success(NOTICE_MESSAGE_UPDATED)))
            }
            AdminAction::GrantPermission(user_id) => {
                self.set_permission(&user_id, true).await
            }
            AdminAction::RevokePermission(user_id) => {
                self.set_permission(&user_id, false).await
            }
            AdminAction::VoidVote(user_id) => {
                if self.repo.find(&user_id).await?.is_none() {
                    return Ok(None);
                }
                let removed = self.repo.delete_for_user(&user_id).await?;
                tracing::info!(user_id = %user_id, removed, "Vote voided");
                Ok(Some(Notice::success(NOTICE_VOTE_VOIDED)))
            }
            AdminAction::ResetVotes => {
                let removed = self.repo.delete_all().await?;
                tracing::warn!(removed, "All votes reset");
                Ok(Some(Notice::warning(NOTICE_VOTES_RESET)))
            }
            AdminAction::ResetPermissions => {
                let revoked = self.repo.revoke_all().await?;
                tracing::warn!(revoked, "All voting permissions revoked");
                Ok(Some(Notice::warning(NOTICE_PERMISSIONS_RESET)))
            }
        }
    }

    async fn set_permission(&self, user_id: &UserId, grant: bool) -> BallotResult<Option<Notice>> {
        let Some(mut profile) = self.repo.find(user_id).await? else {
            tracing::debug!(user_id = %user_id, "Permission change for unknown profile ignored");
            return Ok(None);
        };

        if grant {
            profile.grant();
        } else {
            profile.revoke();
        }
        self.repo.update(&profile).await?;

        tracing::info!(user_id = %user_id, can_vote = grant, "Voting permission changed");

        let text = if grant {
            NOTICE_PERMISSION_GRANTED
        } else {
            NOTICE_PERMISSION_REVOKED
        };
        Ok(Some(Notice::success(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::vote::Vote;
    use crate::domain::value_object::candidate::Candidate;
    use crate::infra::memory::MemoryBallotRepository;
    use platform::flash::NoticeLevel;

    fn use_case(repo: &Arc<MemoryBallotRepository>) -> AdminActionsUseCase<MemoryBallotRepository> {
        AdminActionsUseCase::new(repo.clone(), Arc::new(BallotConfig::default()))
    }

    async fn vote(repo: &MemoryBallotRepository, user_id: UserId, candidate: &str) {
        VoteRepository::create(repo, &Vote::new(user_id, Candidate::new(candidate).unwrap()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_message() {
        let repo = Arc::new(MemoryBallotRepository::new());
        let notice = use_case(&repo)
            .execute(AdminAction::UpdateMessage("Pick a lunch spot".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notice.text, NOTICE_MESSAGE_UPDATED);
        let system = repo.load_or_init("unused").await.unwrap();
        assert_eq!(system.message, "Pick a lunch spot");
    }

    #[tokio::test]
    async fn test_grant_then_revoke() {
        let repo = Arc::new(MemoryBallotRepository::new());
        let uc = use_case(&repo);
        let user_id = UserId::new();
        repo.get_or_create(&user_id).await.unwrap();

        let notice = uc
            .execute(AdminAction::GrantPermission(user_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notice.text, NOTICE_PERMISSION_GRANTED);
        assert!(repo.find(&user_id).await.unwrap().unwrap().can_vote);

        uc.execute(AdminAction::RevokePermission(user_id))
            .await
            .unwrap();
        assert!(!repo.find(&user_id).await.unwrap().unwrap().can_vote);
    }

    #[tokio::test]
    async fn test_missing_profile_is_ignored() {
        let repo = Arc::new(MemoryBallotRepository::new());
        let uc = use_case(&repo);
        let ghost = UserId::new();

        for action in [
            AdminAction::GrantPermission(ghost),
            AdminAction::RevokePermission(ghost),
            AdminAction::VoidVote(ghost),
        ] {
            assert!(uc.execute(action).await.unwrap().is_none());
        }
        assert!(repo.find(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_void_vote() {
        let repo = Arc::new(MemoryBallotRepository::new());
        let user_id = UserId::new();
        repo.get_or_create(&user_id).await.unwrap();
        vote(&repo, user_id, "X").await;

        use_case(&repo)
            .execute(AdminAction::VoidVote(user_id))
            .await
            .unwrap();
        assert!(!repo.exists_for_user(&user_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_resets() {
        let repo = Arc::new(MemoryBallotRepository::new());
        let uc = use_case(&repo);
        for candidate in ["X", "Y", "X"] {
            let user_id = UserId::new();
            let mut profile = repo.get_or_create(&user_id).await.unwrap();
            profile.grant();
            repo.update(&profile).await.unwrap();
            vote(&repo, user_id, candidate).await;
        }

        let notice = uc.execute(AdminAction::ResetVotes).await.unwrap().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(repo.tally().await.unwrap().is_empty());

        let notice = uc
            .execute(AdminAction::ResetPermissions)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notice.text, NOTICE_PERMISSIONS_RESET);
        assert_eq!(repo.authorized_count().await, 0);
    }
}
