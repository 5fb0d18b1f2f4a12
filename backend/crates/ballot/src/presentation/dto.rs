//! API DTOs (Data Transfer Objects)

use platform::flash::Notice;
use serde::{Deserialize, Serialize};

use crate::application::admin_dashboard::UserSummary;
use crate::domain::entity::tally::CandidateTally;

/// Checkbox semantics for `only_authorized`
pub fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "on" | "1" | "yes")
    )
}

// ============================================================================
// Landing
// ============================================================================

/// POST / form; `action` is `login` or `signup`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LandingForm {
    pub action: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingView {
    pub notices: Vec<Notice>,
}

// ============================================================================
// Vote
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteForm {
    pub candidate: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteView {
    pub user_name: String,
    pub first_name: String,
    pub message: String,
    /// Ballot is open for this user
    pub can_vote: bool,
    pub has_voted: bool,
    pub notices: Vec<Notice>,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminQuery {
    pub keyword: Option<String>,
    pub only_authorized: Option<String>,
}

/// POST /root/ form; fields beyond `action` depend on the action
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminForm {
    pub action: Option<String>,
    pub message: Option<String>,
    pub keyword: Option<String>,
    pub only_authorized: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminView {
    pub message: String,
    pub results: Vec<CandidateTally>,
    pub total_votes: u64,
    pub keyword: String,
    pub only_authorized: bool,
    /// Whether `users` reflects a search
    pub searched: bool,
    pub users: Vec<UserSummary>,
    pub notices: Vec<Notice>,
}
