//! Ballot Backend Module
//!
//! Voting workflow and its administration:
//! - voters sign up, wait for permission, then cast exactly one vote
//! - the superuser edits the ballot message, grants or revokes permission,
//!   voids votes and reads the tally
//!
//! Layout follows the `auth` crate (`domain/`, `application/`, `infra/`,
//! `presentation/`). The HTTP surface of the whole service is built by
//! [`presentation::router::ballot_router`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::config::BallotConfig;
pub use error::{BallotError, BallotResult};
pub use infra::memory::MemoryBallotRepository;
pub use infra::postgres::PgBallotRepository;
pub use presentation::router::ballot_router;
pub use presentation::state::BallotAppState;
