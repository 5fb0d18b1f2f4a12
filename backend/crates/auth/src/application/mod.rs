//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod provision_superuser;
pub mod session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use check_session::{ActiveSession, CheckSessionUseCase};
pub use config::AuthConfig;
pub use provision_superuser::{ProvisionOutcome, ProvisionSuperuserUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
