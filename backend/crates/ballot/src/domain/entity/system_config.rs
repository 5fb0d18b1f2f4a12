//! System Config Entity
//!
//! Singleton row holding the message shown above the ballot.

use chrono::{DateTime, Utc};

/// Fixed key of the singleton row
pub const SYSTEM_CONFIG_ID: i16 = 1;

/// Message used when the row is created lazily
pub const DEFAULT_MESSAGE: &str = "Please cast your vote.";

#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub message: String,
    pub updated_at: DateTime<Utc>,
}

impl SystemConfig {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            updated_at: Utc::now(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.updated_at = Utc::now();
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE)
    }
}
