//! Ballot Error Types

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx_error, kind::ErrorKind};
use platform::flash::Notice;
use thiserror::Error;

pub type BallotResult<T> = Result<T, BallotError>;

pub const NOTICE_NOT_PERMITTED: &str = "You do not have permission to vote.";
pub const NOTICE_ALREADY_VOTED: &str = "You have already voted.";

#[derive(Debug, Error)]
pub enum BallotError {
    /// Profile has `can_vote = false`
    #[error("Voting not permitted")]
    VotingNotPermitted,

    /// A vote already exists for the user
    #[error("Already voted")]
    AlreadyVoted,

    #[error("{0}")]
    InvalidCandidate(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BallotError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BallotError::VotingNotPermitted => ErrorKind::Forbidden,
            BallotError::AlreadyVoted => ErrorKind::Conflict,
            BallotError::InvalidCandidate(_) => ErrorKind::BadRequest,
            BallotError::Auth(e) => e.kind(),
            BallotError::Database(e) => classify_sqlx_error(e).0,
            BallotError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Notice for business-rule rejections; storage and internal failures
    /// have none and propagate as error responses
    pub fn notice(&self) -> Option<Notice> {
        match self {
            BallotError::VotingNotPermitted => Some(Notice::error(NOTICE_NOT_PERMITTED)),
            BallotError::AlreadyVoted => Some(Notice::error(NOTICE_ALREADY_VOTED)),
            BallotError::InvalidCandidate(msg) => Some(Notice::error(msg.clone())),
            BallotError::Auth(e) => e.notice(),
            _ => None,
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            BallotError::Auth(e) => e.into_app_error(),
            BallotError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            BallotError::Database(e) => {
                tracing::error!(error = %e, "Ballot database error");
            }
            BallotError::Internal(msg) => {
                tracing::error!(message = %msg, "Ballot internal error");
            }
            BallotError::Auth(e) if e.kind().is_server_error() => {
                tracing::error!(error = %e, "Auth failure in ballot flow");
            }
            _ => {
                tracing::debug!(error = %self, "Ballot error");
            }
        }
    }
}

impl IntoResponse for BallotError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::flash::NoticeLevel;

    #[test]
    fn test_business_rejections_have_notices() {
        let notice = BallotError::VotingNotPermitted.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.text, NOTICE_NOT_PERMITTED);
        assert_eq!(
            BallotError::AlreadyVoted.notice().unwrap().text,
            NOTICE_ALREADY_VOTED
        );
        assert_eq!(
            BallotError::Auth(AuthError::UserNameTaken)
                .notice()
                .unwrap()
                .text,
            auth::error::NOTICE_USER_NAME_TAKEN
        );
    }

    #[test]
    fn test_failures_have_no_notice() {
        assert!(BallotError::Database(sqlx::Error::PoolTimedOut).notice().is_none());
        assert!(BallotError::Internal("x".into()).notice().is_none());
        assert!(BallotError::Auth(AuthError::SessionInvalid).notice().is_none());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            BallotError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            BallotError::Auth(AuthError::Internal("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let response = BallotError::Internal("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
