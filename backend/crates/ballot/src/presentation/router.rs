//! Ballot Router
//!
//! Layering, outermost first:
//! - `load_session` on every route
//! - `require_user` / `require_superuser` on the protected pages
//! - `enforce_rate_limit` on the landing and vote POSTs

use std::sync::Arc;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;

use auth::{AuthMiddlewareState, load_session, require_superuser, require_user};
use platform::rate_limit::{CounterStore, RateLimiter, middleware::enforce_rate_limit};

use crate::presentation::handlers;
use crate::presentation::state::{AuthStore, BallotAppState, BallotStore};

pub const LANDING_PATH: &str = "/";
pub const LOGOUT_PATH: &str = "/logout/";
pub const VOTE_PATH: &str = "/vote/";
pub const ADMIN_PATH: &str = "/root/";

/// Rate limiter action names, also part of the counter keys
pub const LOGIN_ACTION: &str = "login";
pub const VOTE_ACTION: &str = "vote";

/// Create the full router for any repository and counter store implementation
pub fn ballot_router<A, B, S>(state: BallotAppState<A, B>, counter_store: Arc<S>) -> Router
where
    A: AuthStore,
    B: BallotStore,
    S: CounterStore + Send + Sync + 'static,
{
    let login_limiter = RateLimiter::new(
        LOGIN_ACTION,
        state.config.login_rate_limit.clone(),
        counter_store.clone(),
    )
    .with_landing(LANDING_PATH);
    let vote_limiter = RateLimiter::new(
        VOTE_ACTION,
        state.config.vote_rate_limit.clone(),
        counter_store,
    )
    .with_return_to(VOTE_PATH)
    .with_landing(LANDING_PATH);

    let auth_state = AuthMiddlewareState::new(state.auth_repo.clone(), state.auth_config.clone());

    let landing = Router::new()
        .route(
            LANDING_PATH,
            get(handlers::landing).post(handlers::landing_submit::<A, B>),
        )
        .route_layer(from_fn_with_state(login_limiter, enforce_rate_limit::<S>));

    // Anonymous POSTs are turned away before they count against the limit
    let vote = Router::new()
        .route(
            VOTE_PATH,
            get(handlers::vote_page::<A, B>).post(handlers::cast_vote::<A, B>),
        )
        .route_layer(from_fn_with_state(vote_limiter, enforce_rate_limit::<S>))
        .route_layer(from_fn(require_user));

    let admin = Router::new()
        .route(
            ADMIN_PATH,
            get(handlers::admin_page::<A, B>).post(handlers::admin_submit::<A, B>),
        )
        .route_layer(from_fn(require_superuser));

    Router::new()
        .route(LOGOUT_PATH, get(handlers::logout::<A, B>))
        .merge(landing)
        .merge(vote)
        .merge(admin)
        .layer(from_fn_with_state(auth_state, load_session::<A>))
        .with_state(state)
}
