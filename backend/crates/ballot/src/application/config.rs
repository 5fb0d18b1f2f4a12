//! Application Configuration
//!
//! Configuration for the Ballot application layer.

use platform::rate_limit::RateLimitConfig;

use crate::domain::entity::system_config::DEFAULT_MESSAGE;

/// Ballot application configuration
#[derive(Debug, Clone)]
pub struct BallotConfig {
    /// Message stored when the system config row is first created
    pub default_message: String,
    /// Landing page POSTs (login and sign-up)
    pub login_rate_limit: RateLimitConfig,
    /// Vote casting
    pub vote_rate_limit: RateLimitConfig,
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            default_message: DEFAULT_MESSAGE.to_string(),
            login_rate_limit: RateLimitConfig::new(5, 60),
            vote_rate_limit: RateLimitConfig::new(1, 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_limits() {
        let config = BallotConfig::default();
        assert_eq!(config.login_rate_limit.max_requests, 5);
        assert_eq!(config.vote_rate_limit.max_requests, 1);
        assert_eq!(config.vote_rate_limit.window, Duration::from_secs(60));
        assert!(config.vote_rate_limit.fail_open);
        assert_eq!(config.default_message, "Please cast your vote.");
    }
}
