//! Profile Entity
//!
//! Voting rights of a user. A user without a profile is treated as
//! `can_vote = false`; profiles are created on first use.

use chrono::{DateTime, Utc};

use crate::domain::value_object::UserId;

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: UserId,
    pub can_vote: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// New profile without voting permission
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            can_vote: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn grant(&mut self) {
        self.set_can_vote(true);
    }

    pub fn revoke(&mut self) {
        self.set_can_vote(false);
    }

    fn set_can_vote(&mut self, can_vote: bool) {
        self.can_vote = can_vote;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_then_revoke_restores_state() {
        let mut profile = Profile::new(UserId::new());
        assert!(!profile.can_vote);

        profile.grant();
        assert!(profile.can_vote);
        profile.revoke();
        assert!(!profile.can_vote);
        assert!(profile.updated_at >= profile.created_at);
    }
}
