//! Flash Notices
//!
//! One-shot, user-visible messages that survive a redirect. Notices are
//! stored client-side in the `flash` cookie as base64url-encoded JSON and
//! cleared by the page that displays them.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::cookie::{CookieConfig, extract_cookie};
use crate::crypto::{from_base64url, to_base64url};

pub const FLASH_COOKIE_NAME: &str = "flash";

/// Upper bound on decoded notices, so a forged cookie cannot inflate pages
const MAX_NOTICES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Flash cookie attributes. Notices are not secrets, so no `Secure` flag.
pub fn flash_cookie() -> CookieConfig {
    CookieConfig {
        secure: false,
        ..CookieConfig::named(FLASH_COOKIE_NAME)
    }
}

pub fn encode_notices(notices: &[Notice]) -> String {
    to_base64url(&serde_json::to_vec(notices).unwrap_or_default())
}

/// Lenient decoding: anything malformed yields no notices
pub fn decode_notices(value: &str) -> Vec<Notice> {
    let Ok(bytes) = from_base64url(value) else {
        return Vec::new();
    };
    let mut notices: Vec<Notice> = serde_json::from_slice(&bytes).unwrap_or_default();
    notices.truncate(MAX_NOTICES);
    notices
}

/// Notices a response is about to store, read back from its `Set-Cookie` headers
pub fn notices_in_set_cookie(headers: &HeaderMap) -> Vec<Notice> {
    let prefix = format!("{FLASH_COOKIE_NAME}=");
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(|rest| rest.split(';').next().unwrap_or_default())
        .flat_map(decode_notices)
        .collect()
}

// ============================================================================
// Incoming notices
// ============================================================================

/// Notices pending for this request
///
/// Pages that render the notices should append [`IncomingFlash::clear_cookie`]
/// to their response so they are shown once.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash {
    notices: Vec<Notice>,
    cookie_present: bool,
}

impl IncomingFlash {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match extract_cookie(headers, FLASH_COOKIE_NAME) {
            Some(value) => Self {
                notices: decode_notices(&value),
                cookie_present: true,
            },
            None => Self::default(),
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }

    /// Deletion cookie, only when the request carried a flash cookie
    pub fn clear_cookie(&self) -> Option<HeaderValue> {
        if self.cookie_present {
            flash_cookie().delete_cookie_header()
        } else {
            None
        }
    }
}

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

// ============================================================================
// Redirect with notices
// ============================================================================

/// `303 See Other` carrying notices and any extra cookies
///
/// ```rust
/// use platform::flash::{FlashRedirect, Notice};
///
/// let redirect = FlashRedirect::to("/vote/").with_notice(Notice::success("Saved."));
/// assert_eq!(redirect.location(), "/vote/");
/// ```
#[derive(Debug, Clone)]
pub struct FlashRedirect {
    location: String,
    notices: Vec<Notice>,
    cookies: Vec<HeaderValue>,
    retry_after_secs: Option<u64>,
}

impl FlashRedirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            notices: Vec::new(),
            cookies: Vec::new(),
            retry_after_secs: None,
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn with_notices(mut self, notices: impl IntoIterator<Item = Notice>) -> Self {
        self.notices.extend(notices);
        self
    }

    /// Extra `Set-Cookie` value (session cookie, deletion cookie)
    pub fn with_cookie(mut self, set_cookie: Option<HeaderValue>) -> Self {
        self.cookies.extend(set_cookie);
        self
    }

    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut response = StatusCode::SEE_OTHER.into_response();
        let headers = response.headers_mut();

        let location =
            HeaderValue::from_str(&self.location).unwrap_or(HeaderValue::from_static("/"));
        headers.insert(header::LOCATION, location);

        for cookie in self.cookies {
            headers.append(header::SET_COOKIE, cookie);
        }

        if !self.notices.is_empty() {
            if let Some(cookie) = flash_cookie().set_cookie_header(&encode_notices(&self.notices)) {
                headers.append(header::SET_COOKIE, cookie);
            }
        }

        if let Some(secs) = self.retry_after_secs {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}
