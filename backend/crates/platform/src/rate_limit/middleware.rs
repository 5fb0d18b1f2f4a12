//! Axum middleware for rate limiting.
//!
//! `enforce_rate_limit` wraps a route with a [`RateLimiter`]:
//!
//! ```ignore
//! use axum::middleware::from_fn_with_state;
//!
//! Router::new()
//!     .route("/vote/", get(show).post(cast))
//!     .route_layer(from_fn_with_state(vote_limiter, enforce_rate_limit::<MemoryCounterStore>))
//! ```
//!
//! Only POST requests are counted. A rejected request never reaches the
//! handler; it is redirected with an error notice instead.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, warn};

use super::{CounterStore, RateLimitDecision, RateLimiter, whole_secs};
use crate::client::client_identifier;
use crate::flash::{FlashRedirect, Notice};

#[tracing::instrument(skip_all)]
pub async fn enforce_rate_limit<S>(
    State(limiter): State<RateLimiter<S>>,
    request: Request,
    next: Next,
) -> Response
where
    S: CounterStore + Send + Sync + 'static,
{
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let direct_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client_id = client_identifier(request.headers(), direct_ip);

    match limiter.admit(&client_id).await {
        Ok(RateLimitDecision::Allowed { count }) => {
            debug!(action = %limiter.action(), client = %client_id, count, "Request counted");
            next.run(request).await
        }
        Ok(RateLimitDecision::Limited { retry_after }) => {
            warn!(
                action = %limiter.action(),
                client = %client_id,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            reject(&limiter, request.uri().path(), retry_after)
        }
        Err(e) if limiter.config().fail_open => {
            warn!(
                action = %limiter.action(),
                client = %client_id,
                error = %e,
                "Counter store unavailable, allowing request (fail_open=true)"
            );
            next.run(request).await
        }
        Err(e) => {
            error!(
                action = %limiter.action(),
                client = %client_id,
                error = %e,
                "Counter store unavailable, rejecting request"
            );
            reject(&limiter, request.uri().path(), limiter.config().window)
        }
    }
}

fn reject<S>(limiter: &RateLimiter<S>, path: &str, retry_after: Duration) -> Response {
    FlashRedirect::to(limiter.rejection_location(path))
        .with_notice(Notice::error(limiter.rejection_message(retry_after)))
        .with_retry_after(whole_secs(retry_after))
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;
    use crate::flash::notices_in_set_cookie;
    use crate::rate_limit::{CounterStoreError, MemoryCounterStore, RateLimitConfig};

    struct BrokenStore;

    impl CounterStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<u64>, CounterStoreError> {
            Err(CounterStoreError::Unavailable("connection refused".to_string()))
        }

        async fn set(&self, _: &str, _: u64, _: Duration) -> Result<(), CounterStoreError> {
            Err(CounterStoreError::Unavailable("connection refused".to_string()))
        }

        async fn ttl(&self, _key: &str) -> Result<Option<Duration>, CounterStoreError> {
            Err(CounterStoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn app<S>(limiter: RateLimiter<S>, hits: Arc<AtomicUsize>) -> Router
    where
        S: CounterStore + Send + Sync + 'static,
    {
        let handler = move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        };
        Router::new()
            .route("/vote/", get(handler.clone()).post(handler))
            .route_layer(from_fn_with_state(limiter, enforce_rate_limit::<S>))
    }

    fn request(method: Method, client: &str) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri("/vote/")
            .header("x-forwarded-for", client)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_post_is_redirected_with_notice() {
        let hits = Arc::new(AtomicUsize::new(0));
        let limiter = RateLimiter::new(
            "vote",
            RateLimitConfig::new(1, 60),
            Arc::new(MemoryCounterStore::new()),
        )
        .with_return_to("/vote/");
        let app = app(limiter, Arc::clone(&hits));

        let first = app.clone().oneshot(request(Method::POST, "1.1.1.1")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.clone().oneshot(request(Method::POST, "1.1.1.1")).await.unwrap();
        assert_eq!(second.status(), StatusCode::SEE_OTHER);
        assert_eq!(second.headers()[header::LOCATION], "/vote/");
        assert_eq!(second.headers()[header::RETRY_AFTER], "60");
        assert_eq!(
            notices_in_set_cookie(second.headers()),
            vec![Notice::error(
                "Too many requests. Please try again in 60 seconds."
            )]
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // another client is unaffected, and GET is never counted
        let other = app.clone().oneshot(request(Method::POST, "2.2.2.2")).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
        let get = app.clone().oneshot(request(Method::GET, "1.1.1.1")).await.unwrap();
        assert_eq!(get.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        tokio::time::advance(Duration::from_secs(50)).await;
        let waiting = app.clone().oneshot(request(Method::POST, "1.1.1.1")).await.unwrap();
        assert_eq!(waiting.headers()[header::RETRY_AFTER], "10");
        assert_eq!(
            notices_in_set_cookie(waiting.headers()),
            vec![Notice::error(
                "Too many requests. Please try again in 10 seconds."
            )]
        );

        tokio::time::advance(Duration::from_secs(11)).await;
        let later = app.oneshot(request(Method::POST, "1.1.1.1")).await.unwrap();
        assert_eq!(later.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_store_failure_fails_open() {
        let hits = Arc::new(AtomicUsize::new(0));
        let limiter = RateLimiter::new("vote", RateLimitConfig::new(1, 60), Arc::new(BrokenStore));
        let app = app(limiter, Arc::clone(&hits));

        for _ in 0..3 {
            let response = app.clone().oneshot(request(Method::POST, "1.1.1.1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_store_failure_fails_closed_when_configured() {
        let hits = Arc::new(AtomicUsize::new(0));
        let config = RateLimitConfig {
            fail_open: false,
            ..RateLimitConfig::new(1, 60)
        };
        let limiter = RateLimiter::new("vote", config, Arc::new(BrokenStore));
        let app = app(limiter, Arc::clone(&hits));

        let response = app.oneshot(request(Method::POST, "1.1.1.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
