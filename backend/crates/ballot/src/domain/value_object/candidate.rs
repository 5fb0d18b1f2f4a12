//! Candidate Value Object
//!
//! Free-text name of whoever a vote is cast for.
//!
//! ## Rules
//! - Trimmed
//! - 1 to 100 characters

use serde::Serialize;
use std::fmt;

/// Maximum length for a candidate name (in characters)
pub const CANDIDATE_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    /// Nothing left after trimming
    Empty,

    TooLong { length: usize, max: usize },
}

impl fmt::Display for CandidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Candidate cannot be empty."),
            Self::TooLong { length, max } => {
                write!(
                    f,
                    "Candidate name is too long ({length} characters, maximum {max})."
                )
            }
        }
    }
}

impl std::error::Error for CandidateError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(value: &str) -> Result<Self, CandidateError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CandidateError::Empty);
        }

        let length = trimmed.chars().count();
        if length > CANDIDATE_MAX_LENGTH {
            return Err(CandidateError::TooLong {
                length,
                max: CANDIDATE_MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed() {
        assert_eq!(Candidate::new("  X ").unwrap().as_str(), "X");
    }

    #[test]
    fn test_blank_rejected() {
        assert_eq!(Candidate::new(""), Err(CandidateError::Empty));
        assert_eq!(Candidate::new(" \t\n"), Err(CandidateError::Empty));
    }

    #[test]
    fn test_length_limit_counts_characters() {
        let at_limit = "é".repeat(CANDIDATE_MAX_LENGTH);
        assert!(Candidate::new(&at_limit).is_ok());

        let over = "a".repeat(CANDIDATE_MAX_LENGTH + 1);
        assert_eq!(
            Candidate::new(&over),
            Err(CandidateError::TooLong {
                length: CANDIDATE_MAX_LENGTH + 1,
                max: CANDIDATE_MAX_LENGTH
            })
        );
    }
}
