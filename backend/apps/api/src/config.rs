//! Server configuration from the environment
//!
//! | variable | default |
//! |---|---|
//! | `DATABASE_URL` | required |
//! | `DATABASE_MAX_CONNECTIONS` | `5` |
//! | `BIND_ADDR` | `0.0.0.0:31113` |
//! | `ROOT_USERNAME` | `root` |
//! | `ROOT_PASSWORD` | required |
//! | `SESSION_SECRET` | base64 of 32 bytes; random in debug builds, required in release |
//! | `PASSWORD_PEPPER` | none |
//! | `COOKIE_SECURE` | `true` in release builds |
//! | `LOGIN_RATE_LIMIT` | `5/60` |
//! | `VOTE_RATE_LIMIT` | `1/60` |
//! | `RATE_LIMIT_FAIL_OPEN` | `true` |

use std::net::SocketAddr;

use anyhow::{Context, anyhow, bail};
use auth::AuthConfig;
use ballot::BallotConfig;
use base64::Engine;
use base64::engine::general_purpose;
use platform::rate_limit::RateLimitConfig;

pub struct ApiConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub root_username: String,
    pub root_password: String,
    pub auth: AuthConfig,
    pub ballot: BallotConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), !cfg!(debug_assertions))
    }

    /// Build from any key lookup; `release` turns on the production requirements
    pub fn from_lookup<F>(lookup: F, release: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {v}"))?,
            None => 5,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:31113".to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let root_username = get("ROOT_USERNAME").unwrap_or_else(|| "root".to_string());
        // No fallback: a missing administrator password is a deployment error
        let root_password = lookup("ROOT_PASSWORD")
            .filter(|v| !v.is_empty())
            .context("ROOT_PASSWORD must be set")?;

        let session_secret = match get("SESSION_SECRET") {
            Some(encoded) => decode_secret(&encoded)?,
            None if release => bail!("SESSION_SECRET must be set in production"),
            None => {
                tracing::warn!("SESSION_SECRET not set, using a random secret");
                platform::crypto::random_secret()
            }
        };

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(v) => parse_bool("COOKIE_SECURE", &v)?,
            None => release,
        };

        let fail_open = match get("RATE_LIMIT_FAIL_OPEN") {
            Some(v) => parse_bool("RATE_LIMIT_FAIL_OPEN", &v)?,
            None => true,
        };

        let defaults = BallotConfig::default();
        let login_rate_limit = rate_limit(
            get("LOGIN_RATE_LIMIT"),
            "LOGIN_RATE_LIMIT",
            defaults.login_rate_limit.clone(),
            fail_open,
        )?;
        let vote_rate_limit = rate_limit(
            get("VOTE_RATE_LIMIT"),
            "VOTE_RATE_LIMIT",
            defaults.vote_rate_limit.clone(),
            fail_open,
        )?;

        let auth = AuthConfig {
            session_secret,
            cookie_secure,
            password_pepper: lookup("PASSWORD_PEPPER")
                .filter(|v| !v.is_empty())
                .map(String::into_bytes),
            ..AuthConfig::default()
        };

        let ballot = BallotConfig {
            login_rate_limit,
            vote_rate_limit,
            ..defaults
        };

        Ok(Self {
            database_url,
            database_max_connections,
            bind_addr,
            root_username,
            root_password,
            auth,
            ballot,
        })
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded)
        .context("SESSION_SECRET is not valid base64")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", b.len()))
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be true or false, got {value}"),
    }
}

fn rate_limit(
    value: Option<String>,
    key: &str,
    default: RateLimitConfig,
    fail_open: bool,
) -> anyhow::Result<RateLimitConfig> {
    let config = match value {
        Some(v) => RateLimitConfig::parse(&v)
            .with_context(|| format!("{key} must look like <max>/<seconds>, got {v}"))?,
        None => default,
    };
    Ok(RateLimitConfig { fail_open, ..config })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn load(vars: &[(&str, &str)], release: bool) -> anyhow::Result<ApiConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned(), release)
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/ballot"),
        ("ROOT_PASSWORD", "Str0ng-Admin-Pass"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED, false).unwrap();
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.bind_addr.port(), 31113);
        assert_eq!(config.root_username, "root");
        assert!(!config.auth.cookie_secure);
        assert!(config.auth.password_pepper.is_none());
        assert_eq!(config.ballot.login_rate_limit.max_requests, 5);
        assert_eq!(config.ballot.vote_rate_limit.max_requests, 1);
        assert!(config.ballot.vote_rate_limit.fail_open);
    }

    #[test]
    fn test_root_password_required() {
        let err = load(&REQUIRED[..1], false).err().unwrap();
        assert!(err.to_string().contains("ROOT_PASSWORD"));
    }

    #[test]
    fn test_release_requires_session_secret() {
        let err = load(&REQUIRED, true).err().unwrap();
        assert!(err.to_string().contains("SESSION_SECRET"));

        let secret = general_purpose::STANDARD.encode([7u8; 32]);
        let mut vars = REQUIRED.to_vec();
        vars.push(("SESSION_SECRET", secret.as_str()));
        let config = load(&vars, true).unwrap();
        assert_eq!(config.auth.session_secret, [7u8; 32]);
        assert!(config.auth.cookie_secure);
    }

    #[test]
    fn test_short_session_secret_rejected() {
        let secret = general_purpose::STANDARD.encode([7u8; 16]);
        let mut vars = REQUIRED.to_vec();
        vars.push(("SESSION_SECRET", secret.as_str()));
        assert!(load(&vars, false).is_err());
    }

    #[test]
    fn test_rate_limit_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("VOTE_RATE_LIMIT", "3/120"));
        vars.push(("RATE_LIMIT_FAIL_OPEN", "false"));
        let config = load(&vars, false).unwrap();
        assert_eq!(config.ballot.vote_rate_limit.max_requests, 3);
        assert_eq!(config.ballot.vote_rate_limit.window, Duration::from_secs(120));
        assert!(!config.ballot.vote_rate_limit.fail_open);
        assert!(!config.ballot.login_rate_limit.fail_open);

        let mut vars = REQUIRED.to_vec();
        vars.push(("LOGIN_RATE_LIMIT", "five"));
        assert!(load(&vars, false).is_err());
    }
}
