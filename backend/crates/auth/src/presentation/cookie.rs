//! Session cookie helpers

use axum::http::{HeaderMap, HeaderValue, header};
use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;

/// Session token from the request cookies
pub fn session_token(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    extract_cookie(headers, &config.session_cookie_name).filter(|t| !t.is_empty())
}

pub fn session_cookie(config: &AuthConfig, token: &str) -> Option<HeaderValue> {
    config.session_cookie().set_cookie_header(token)
}

pub fn clear_session_cookie(config: &AuthConfig) -> Option<HeaderValue> {
    config.session_cookie().delete_cookie_header()
}

/// Whether a response already sets (or deletes) the session cookie
pub fn sets_session_cookie(headers: &HeaderMap, config: &AuthConfig) -> bool {
    let prefix = format!("{}=", config.session_cookie_name);
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_extraction() {
        let config = AuthConfig::development();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("flash=x; ballot_session=abc.def"),
        );
        assert_eq!(session_token(&headers, &config).as_deref(), Some("abc.def"));

        headers.insert(header::COOKIE, HeaderValue::from_static("ballot_session="));
        assert_eq!(session_token(&headers, &config), None);
    }

    #[test]
    fn test_sets_session_cookie() {
        let config = AuthConfig::development();
        let mut headers = HeaderMap::new();
        assert!(!sets_session_cookie(&headers, &config));

        headers.append(header::SET_COOKIE, HeaderValue::from_static("flash=abc; Path=/"));
        assert!(!sets_session_cookie(&headers, &config));

        headers.append(header::SET_COOKIE, clear_session_cookie(&config).unwrap());
        assert!(sets_session_cookie(&headers, &config));
    }
}
