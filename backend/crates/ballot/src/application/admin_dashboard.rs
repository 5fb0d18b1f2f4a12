//! Admin Dashboard Use Case
//!
//! Read side of the admin surface: message, tally and the user list.

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use serde::Serialize;

use crate::application::config::BallotConfig;
use crate::domain::entity::tally::CandidateTally;
use crate::domain::repository::{ProfileRepository, SystemConfigRepository, VoteRepository};
use crate::error::BallotResult;

#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    pub keyword: Option<String>,
    pub only_authorized: bool,
}

impl DashboardQuery {
    /// Trimmed keyword, `None` when blank
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// The user list is only built for a search
    pub fn is_search(&self) -> bool {
        self.keyword().is_some() || self.only_authorized
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    pub user_name: String,
    pub first_name: String,
    pub can_vote: bool,
    pub has_voted: bool,
}

#[derive(Debug, Clone)]
pub struct AdminDashboard {
    pub message: String,
    pub tally: Vec<CandidateTally>,
    pub total_votes: u64,
    pub searched: bool,
    pub users: Vec<UserSummary>,
}

/// Admin dashboard use case
pub struct AdminDashboardUseCase<A, R>
where
    A: UserRepository,
    R: ProfileRepository + VoteRepository + SystemConfigRepository,
{
    user_repo: Arc<A>,
    repo: Arc<R>,
    config: Arc<BallotConfig>,
}

impl<A, R> AdminDashboardUseCase<A, R>
where
    A: UserRepository + Sync,
    R: ProfileRepository + VoteRepository + SystemConfigRepository + Sync,
{
    pub fn new(user_repo: Arc<A>, repo: Arc<R>, config: Arc<BallotConfig>) -> Self {
        Self {
            user_repo,
            repo,
            config,
        }
    }

    pub async fn execute(&self, query: &DashboardQuery) -> BallotResult<AdminDashboard> {
        let system = self.repo.load_or_init(&self.config.default_message).await?;
        let tally = self.repo.tally().await?;
        let total_votes = tally.iter().map(|row| row.votes).sum();

        let searched = query.is_search();
        let users = if searched {
            self.search_users(query).await?
        } else {
            Vec::new()
        };

        Ok(AdminDashboard {
            message: system.message,
            tally,
            total_votes,
            searched,
            users,
        })
    }

    async fn search_users(&self, query: &DashboardQuery) -> BallotResult<Vec<UserSummary>> {
        let matches = self.user_repo.search(query.keyword().unwrap_or("")).await?;

        let mut users = Vec::with_capacity(matches.len());
        for user in matches {
            // Backfill profiles for users that never had one
            let profile = self.repo.get_or_create(&user.user_id).await?;
            if query.only_authorized && !profile.can_vote {
                continue;
            }
            let has_voted = self.repo.exists_for_user(&user.user_id).await?;
            users.push(UserSummary {
                user_id: user.user_id.to_string(),
                user_name: user.user_name.into_inner(),
                first_name: user.first_name.as_str().to_string(),
                can_vote: profile.can_vote,
                has_voted,
            });
        }

        tracing::debug!(
            keyword = ?query.keyword(),
            only_authorized = query.only_authorized,
            count = users.len(),
            "User search"
        );

        Ok(users)
    }
}
