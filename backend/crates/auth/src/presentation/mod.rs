//! Presentation Layer
//!
//! Session cookie handling and access-control middleware. The HTTP pages
//! themselves live in the `ballot` crate.

pub mod cookie;
pub mod middleware;

pub use middleware::{
    AuthMiddlewareState, AuthStatus, CurrentUser, LOGIN_PATH, load_session, require_superuser,
    require_user,
};
