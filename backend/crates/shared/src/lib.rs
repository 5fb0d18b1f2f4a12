//! Shared Kernel
//!
//! Vocabulary shared by every domain crate of the voting service:
//! - the unified error type ([`error::app_error::AppError`]) and its classification
//! - typed identifiers ([`id::Id`]) for users, sessions and votes
//!
//! Only things whose meaning is identical in `auth` and `ballot` belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
