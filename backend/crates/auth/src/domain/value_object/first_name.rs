//! First Name Value Object
//!
//! Free-text display name given at sign-up. May be empty.

use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::error::{AuthError, AuthResult};

pub const FIRST_NAME_MAX_LENGTH: usize = 150;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstName(String);

impl FirstName {
    pub fn new(input: impl AsRef<str>) -> AuthResult<Self> {
        let normalized = input.as_ref().nfkc().collect::<String>().trim().to_string();

        if normalized.chars().count() > FIRST_NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "First name must be at most {FIRST_NAME_MAX_LENGTH} characters."
            )));
        }
        if normalized.chars().any(char::is_control) {
            return Err(AuthError::Validation(
                "First name contains invalid characters.".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FirstName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
