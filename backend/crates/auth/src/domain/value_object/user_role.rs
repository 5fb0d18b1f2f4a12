use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    #[display("voter")]
    Voter = 0,
    #[display("superuser")]
    Superuser = 1,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn is_superuser(&self) -> bool {
        matches!(self, UserRole::Superuser)
    }

    /// Landing surface after login
    #[inline]
    pub const fn home_path(&self) -> &'static str {
        match self {
            UserRole::Voter => "/vote/",
            UserRole::Superuser => "/root/",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(UserRole::Voter),
            1 => Some(UserRole::Superuser),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), Some(UserRole::Voter));
        assert_eq!(UserRole::from_id(1), Some(UserRole::Superuser));
        assert_eq!(UserRole::from_id(7), None);
        assert_eq!(UserRole::from_id(UserRole::Superuser.id()), Some(UserRole::Superuser));
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Voter.to_string(), "voter");
        assert_eq!(UserRole::Superuser.to_string(), "superuser");
    }

    #[test]
    fn test_home_path() {
        assert_eq!(UserRole::Voter.home_path(), "/vote/");
        assert_eq!(UserRole::Superuser.home_path(), "/root/");
        assert!(!UserRole::default().is_superuser());
    }
}
