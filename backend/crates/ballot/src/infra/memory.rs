//! In-Memory Repository Implementation
//!
//! Same contracts as the PostgreSQL repository, for tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entity::{
    profile::Profile,
    system_config::SystemConfig,
    tally::{CandidateTally, sort_tally},
    vote::Vote,
};
use crate::domain::repository::{ProfileRepository, SystemConfigRepository, VoteRepository};
use crate::domain::value_object::UserId;
use crate::error::{BallotError, BallotResult};

#[derive(Debug, Default)]
struct Tables {
    profiles: HashMap<UserId, Profile>,
    /// Keyed by user: one vote per user
    votes: HashMap<UserId, Vote>,
    system: Option<SystemConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBallotRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryBallotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn profile_count(&self) -> usize {
        self.tables.read().await.profiles.len()
    }

    pub async fn authorized_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.profiles.values().filter(|p| p.can_vote).count()
    }

    pub async fn votes(&self) -> Vec<Vote> {
        self.tables.read().await.votes.values().cloned().collect()
    }
}

impl ProfileRepository for MemoryBallotRepository {
    async fn find(&self, user_id: &UserId) -> BallotResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(user_id).cloned())
    }

    async fn get_or_create(&self, user_id: &UserId) -> BallotResult<Profile> {
        let mut tables = self.tables.write().await;
        let profile = tables
            .profiles
            .entry(*user_id)
            .or_insert_with(|| Profile::new(*user_id));
        Ok(profile.clone())
    }

    async fn update(&self, profile: &Profile) -> BallotResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.profiles.get_mut(&profile.user_id) {
            *stored = profile.clone();
        }
        Ok(())
    }

    async fn revoke_all(&self) -> BallotResult<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut revoked = 0;
        for profile in tables.profiles.values_mut().filter(|p| p.can_vote) {
            profile.can_vote = false;
            profile.updated_at = now;
            revoked += 1;
        }
        Ok(revoked)
    }
}

impl VoteRepository for MemoryBallotRepository {
    async fn exists_for_user(&self, user_id: &UserId) -> BallotResult<bool> {
        Ok(self.tables.read().await.votes.contains_key(user_id))
    }

    async fn create(&self, vote: &Vote) -> BallotResult<()> {
        let mut tables = self.tables.write().await;
        if tables.votes.contains_key(&vote.user_id) {
            return Err(BallotError::AlreadyVoted);
        }
        tables.votes.insert(vote.user_id, vote.clone());
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> BallotResult<u64> {
        let mut tables = self.tables.write().await;
        Ok(u64::from(tables.votes.remove(user_id).is_some()))
    }

    async fn delete_all(&self) -> BallotResult<u64> {
        let mut tables = self.tables.write().await;
        let removed = tables.votes.len() as u64;
        tables.votes.clear();
        Ok(removed)
    }

    async fn tally(&self) -> BallotResult<Vec<CandidateTally>> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for vote in tables.votes.values() {
            *counts.entry(vote.candidate.as_str()).or_default() += 1;
        }

        let mut tally: Vec<CandidateTally> = counts
            .into_iter()
            .map(|(candidate, votes)| CandidateTally {
                candidate: candidate.to_string(),
                votes,
            })
            .collect();
        sort_tally(&mut tally);
        Ok(tally)
    }
}

impl SystemConfigRepository for MemoryBallotRepository {
    async fn load_or_init(&self, default_message: &str) -> BallotResult<SystemConfig> {
        let mut tables = self.tables.write().await;
        let system = tables
            .system
            .get_or_insert_with(|| SystemConfig::new(default_message));
        Ok(system.clone())
    }

    async fn save(&self, config: &SystemConfig) -> BallotResult<()> {
        self.tables.write().await.system = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::candidate::Candidate;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let repo = MemoryBallotRepository::new();
        let user_id = UserId::new();

        let mut first = repo.get_or_create(&user_id).await.unwrap();
        first.grant();
        repo.update(&first).await.unwrap();

        let second = repo.get_or_create(&user_id).await.unwrap();
        assert!(second.can_vote);
        assert_eq!(repo.profile_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_skips_missing_profile() {
        let repo = MemoryBallotRepository::new();
        let mut profile = Profile::new(UserId::new());
        profile.grant();

        repo.update(&profile).await.unwrap();
        assert!(repo.find(&profile.user_id).await.unwrap().is_none());
        assert_eq!(repo.profile_count().await, 0);
    }

    #[tokio::test]
    async fn test_second_vote_rejected() {
        let repo = MemoryBallotRepository::new();
        let user_id = UserId::new();
        repo.create(&Vote::new(user_id, Candidate::new("X").unwrap()))
            .await
            .unwrap();

        let err = repo
            .create(&Vote::new(user_id, Candidate::new("Y").unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, BallotError::AlreadyVoted));
        assert_eq!(repo.votes().await.len(), 1);
    }

    #[tokio::test]
    async fn test_system_config_initialized_once() {
        let repo = MemoryBallotRepository::new();
        let mut system = repo.load_or_init("first").await.unwrap();
        assert_eq!(system.message, "first");

        system.set_message("changed");
        repo.save(&system).await.unwrap();
        assert_eq!(repo.load_or_init("second").await.unwrap().message, "changed");
    }
}
