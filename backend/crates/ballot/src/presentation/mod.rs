//! Presentation Layer
//!
//! HTTP surface of the service: landing, logout, vote and admin pages.
//! Pages answer with JSON views; every form POST answers with a redirect
//! carrying flash notices.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::{ADMIN_PATH, LANDING_PATH, LOGOUT_PATH, VOTE_PATH, ballot_router};
pub use state::{AuthStore, BallotAppState, BallotStore};
