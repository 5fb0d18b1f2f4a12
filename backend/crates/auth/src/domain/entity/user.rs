//! User Entity
//!
//! Identity data without credentials. Voting rights live in the `ballot` crate.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    UserId, first_name::FirstName, user_name::UserName, user_role::UserRole,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, case-sensitive login name
    pub user_name: UserName,
    pub first_name: FirstName,
    pub user_role: UserRole,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new voter
    pub fn new(user_name: UserName, first_name: FirstName) -> Self {
        Self::with_role(user_name, first_name, UserRole::Voter)
    }

    pub fn with_role(user_name: UserName, first_name: FirstName, user_role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            user_name,
            first_name,
            user_role,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn is_superuser(&self) -> bool {
        self.user_role.is_superuser()
    }

    /// Case-insensitive substring match on user name or first name
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.user_name.as_str().to_lowercase().contains(&keyword)
            || self.first_name.as_str().to_lowercase().contains(&keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, first: &str) -> User {
        User::new(UserName::new(name).unwrap(), FirstName::new(first).unwrap())
    }

    #[test]
    fn test_new_user_is_voter() {
        let u = user("alice", "Alice");
        assert_eq!(u.user_role, UserRole::Voter);
        assert!(u.last_login_at.is_none());
        assert!(!u.is_superuser());
    }

    #[test]
    fn test_record_login() {
        let mut u = user("alice", "Alice");
        u.record_login();
        assert!(u.last_login_at.is_some());
        assert_eq!(u.last_login_at, Some(u.updated_at));
    }

    #[test]
    fn test_matches_keyword() {
        let u = user("Alice_01", "Wonder");
        assert!(u.matches_keyword("ali"));
        assert!(u.matches_keyword("ALICE"));
        assert!(u.matches_keyword("wond"));
        assert!(!u.matches_keyword("bob"));
    }
}
