//! Vote Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{UserId, VoteId, candidate::Candidate};

/// A cast vote; at most one exists per user
#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub vote_id: VoteId,
    pub user_id: UserId,
    pub candidate: Candidate,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(user_id: UserId, candidate: Candidate) -> Self {
        Self {
            vote_id: VoteId::new(),
            user_id,
            candidate,
            created_at: Utc::now(),
        }
    }
}
