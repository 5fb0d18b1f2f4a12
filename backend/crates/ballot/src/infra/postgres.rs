//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    profile::Profile,
    system_config::{SYSTEM_CONFIG_ID, SystemConfig},
    tally::CandidateTally,
    vote::Vote,
};
use crate::domain::repository::{ProfileRepository, SystemConfigRepository, VoteRepository};
use crate::domain::value_object::UserId;
use crate::error::{BallotError, BallotResult};

/// PostgreSQL-backed ballot repository
#[derive(Clone)]
pub struct PgBallotRepository {
    pool: PgPool,
}

impl PgBallotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgBallotRepository {
    async fn find(&self, user_id: &UserId) -> BallotResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, can_vote, created_at, updated_at
            FROM voter_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn get_or_create(&self, user_id: &UserId) -> BallotResult<Profile> {
        let fresh = Profile::new(*user_id);
        sqlx::query(
            r#"
            INSERT INTO voter_profiles (user_id, can_vote, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(fresh.user_id.as_uuid())
        .bind(fresh.can_vote)
        .bind(fresh.created_at)
        .bind(fresh.updated_at)
        .execute(&self.pool)
        .await?;

        self.find(user_id)
            .await?
            .ok_or_else(|| BallotError::Internal("Profile vanished after insert".to_string()))
    }

    async fn update(&self, profile: &Profile) -> BallotResult<()> {
        sqlx::query(
            r#"
            UPDATE voter_profiles SET
                can_vote = $2,
                updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(profile.user_id.as_uuid())
        .bind(profile.can_vote)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn revoke_all(&self) -> BallotResult<u64> {
        let result = sqlx::query(
            "UPDATE voter_profiles SET can_vote = FALSE, updated_at = NOW() WHERE can_vote",
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Vote Repository Implementation
// ============================================================================

impl VoteRepository for PgBallotRepository {
    async fn exists_for_user(&self, user_id: &UserId) -> BallotResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM votes WHERE user_id = $1)")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create(&self, vote: &Vote) -> BallotResult<()> {
        sqlx::query(
            r#"
            INSERT INTO votes (vote_id, user_id, candidate, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(vote.vote_id.as_uuid())
        .bind(vote.user_id.as_uuid())
        .bind(vote.candidate.as_str())
        .bind(vote.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BallotError::AlreadyVoted
            } else {
                BallotError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> BallotResult<u64> {
        let result = sqlx::query("DELETE FROM votes WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> BallotResult<u64> {
        let result = sqlx::query("DELETE FROM votes")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn tally(&self) -> BallotResult<Vec<CandidateTally>> {
        let rows = sqlx::query_as::<_, TallyRow>(
            r#"
            SELECT candidate, COUNT(*) AS votes
            FROM votes
            GROUP BY candidate
            ORDER BY COUNT(*) DESC, candidate COLLATE "C"
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TallyRow::into_tally).collect())
    }
}

// ============================================================================
// System Config Repository Implementation
// ============================================================================

impl SystemConfigRepository for PgBallotRepository {
    async fn load_or_init(&self, default_message: &str) -> BallotResult<SystemConfig> {
        sqlx::query(
            r#"
            INSERT INTO system_config (id, message, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(SYSTEM_CONFIG_ID)
        .bind(default_message)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, SystemConfigRow>(
            "SELECT message, updated_at FROM system_config WHERE id = $1",
        )
        .bind(SYSTEM_CONFIG_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_system_config())
    }

    async fn save(&self, config: &SystemConfig) -> BallotResult<()> {
        sqlx::query(
            r#"
            INSERT INTO system_config (id, message, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                message = EXCLUDED.message,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(SYSTEM_CONFIG_ID)
        .bind(&config.message)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    can_vote: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            user_id: UserId::from_uuid(self.user_id),
            can_vote: self.can_vote,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TallyRow {
    candidate: String,
    votes: i64,
}

impl TallyRow {
    fn into_tally(self) -> CandidateTally {
        CandidateTally {
            candidate: self.candidate,
            votes: self.votes.max(0) as u64,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SystemConfigRow {
    message: String,
    updated_at: DateTime<Utc>,
}

impl SystemConfigRow {
    fn into_system_config(self) -> SystemConfig {
        SystemConfig {
            message: self.message,
            updated_at: self.updated_at,
        }
    }
}
