//! Client identification utilities
//!
//! Functions for identifying the caller of a request behind an optional
//! reverse proxy.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Identifier used when neither a forwarded address nor a socket address is known
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For first (first entry of the chain), then falls
/// back to the direct connection IP. Unparsable forwarded values are ignored.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(first) = first_forwarded(headers) {
        if let Ok(ip) = first.parse::<IpAddr>() {
            return Some(ip);
        }
    }
    direct_ip
}

/// Client identifier for rate limiting
///
/// The first X-Forwarded-For value wins verbatim when present; otherwise the
/// direct connection address; otherwise [`UNKNOWN_CLIENT`].
pub fn client_identifier(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    if let Some(first) = first_forwarded(headers) {
        return first.to_string();
    }
    direct_ip
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Best-known client IP of a request
///
/// Works with and without `into_make_service_with_connect_info`; a missing
/// socket address yields `None` instead of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub Option<IpAddr>);

impl ClientAddr {
    pub fn to_string_opt(&self) -> Option<String> {
        self.0.map(|ip| ip.to_string())
    }
}

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(Self(extract_client_ip(&parts.headers, direct_ip)))
    }
}

fn first_forwarded(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
}
