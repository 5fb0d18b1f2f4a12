//! HTTP Handlers

use axum::Json;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Redirect, Response};
use url::Url;

use auth::application::{SignInInput, SignInUseCase, SignOutUseCase};
use auth::presentation::cookie::{clear_session_cookie, session_cookie, session_token};
use auth::{AuthStatus, CurrentUser};
use kernel::id::UserId;
use platform::client::ClientAddr;
use platform::flash::{FlashRedirect, IncomingFlash, Notice};

use crate::application::{
    AdminAction, AdminActionsUseCase, AdminDashboardUseCase, CastVoteOutcome, CastVoteUseCase,
    DashboardQuery, RegisterVoterInput, RegisterVoterUseCase, VotingStatusUseCase,
};
use crate::error::{BallotError, BallotResult};
use crate::presentation::dto::{
    AdminForm, AdminQuery, AdminView, LandingForm, LandingView, VoteForm, VoteView, is_checked,
};
use crate::presentation::router::{ADMIN_PATH, LANDING_PATH, VOTE_PATH};
use crate::presentation::state::{AuthStore, BallotAppState, BallotStore};

pub const NOTICE_SIGNED_UP: &str = "Sign-up complete.";
pub const NOTICE_VOTE_RECORDED: &str = "Your vote has been recorded.";

/// Business-rule rejections become a redirect with a notice; anything else
/// stays an error response
fn redirect_with_notice(err: BallotError, location: &str) -> BallotResult<Response> {
    match err.notice() {
        Some(notice) => {
            tracing::debug!(error = %err, location, "Request rejected with notice");
            Ok(FlashRedirect::to(location).with_notice(notice).into_response())
        }
        None => Err(err),
    }
}

/// Page response that consumes the pending notices
fn render_page(flash: &IncomingFlash, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if let Some(clear) = flash.clear_cookie() {
        response.headers_mut().append(header::SET_COOKIE, clear);
    }
    response
}

// ============================================================================
// Landing
// ============================================================================

/// GET /
pub async fn landing(status: AuthStatus, flash: IncomingFlash) -> Response {
    if let Some(current) = status.current {
        return Redirect::to(current.user.user_role.home_path()).into_response();
    }

    let view = LandingView {
        notices: flash.notices().to_vec(),
    };
    render_page(&flash, Json(view))
}

/// POST /
pub async fn landing_submit<A, B>(
    State(state): State<BallotAppState<A, B>>,
    client: ClientAddr,
    Form(form): Form<LandingForm>,
) -> BallotResult<Response>
where
    A: AuthStore,
    B: BallotStore,
{
    match form.action.as_deref() {
        Some("login") => login(&state, client, form).await,
        Some("signup") => sign_up(&state, client, form).await,
        other => {
            tracing::debug!(action = ?other, "Unknown landing action");
            Ok(FlashRedirect::to(LANDING_PATH).into_response())
        }
    }
}

async fn login<A, B>(
    state: &BallotAppState<A, B>,
    client: ClientAddr,
    form: LandingForm,
) -> BallotResult<Response>
where
    A: AuthStore,
    B: BallotStore,
{
    let use_case = SignInUseCase::new(
        state.auth_repo.clone(),
        state.auth_repo.clone(),
        state.auth_repo.clone(),
        state.auth_config.clone(),
    );

    let input = SignInInput {
        user_name: form.username.unwrap_or_default(),
        password: form.password.unwrap_or_default(),
        client_ip: client.to_string_opt(),
    };

    match use_case.execute(input).await {
        Ok(output) => Ok(FlashRedirect::to(output.user.user_role.home_path())
            .with_cookie(session_cookie(&state.auth_config, &output.session_token))
            .into_response()),
        Err(e) => redirect_with_notice(e.into(), LANDING_PATH),
    }
}

async fn sign_up<A, B>(
    state: &BallotAppState<A, B>,
    client: ClientAddr,
    form: LandingForm,
) -> BallotResult<Response>
where
    A: AuthStore,
    B: BallotStore,
{
    let use_case = RegisterVoterUseCase::new(
        state.auth_repo.clone(),
        state.ballot_repo.clone(),
        state.auth_config.clone(),
    );

    let input = RegisterVoterInput {
        user_name: form.username.unwrap_or_default(),
        password: form.password.unwrap_or_default(),
        first_name: form.first_name.unwrap_or_default(),
        client_ip: client.to_string_opt(),
    };

    match use_case.execute(input).await {
        Ok(output) => Ok(FlashRedirect::to(VOTE_PATH)
            .with_notice(Notice::success(NOTICE_SIGNED_UP))
            .with_cookie(session_cookie(&state.auth_config, &output.session_token))
            .into_response()),
        Err(e) => redirect_with_notice(e, LANDING_PATH),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET /logout/
pub async fn logout<A, B>(State(state): State<BallotAppState<A, B>>, headers: HeaderMap) -> Response
where
    A: AuthStore,
    B: BallotStore,
{
    if let Some(token) = session_token(&headers, &state.auth_config) {
        let use_case = SignOutUseCase::new(state.auth_repo.clone(), state.auth_config.clone());
        // The cookie is cleared either way
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign-out without a live session");
        }
    }

    FlashRedirect::to(LANDING_PATH)
        .with_cookie(clear_session_cookie(&state.auth_config))
        .into_response()
}

// ============================================================================
// Vote
// ============================================================================

/// GET /vote/
pub async fn vote_page<A, B>(
    State(state): State<BallotAppState<A, B>>,
    current: CurrentUser,
    flash: IncomingFlash,
) -> BallotResult<Response>
where
    A: AuthStore,
    B: BallotStore,
{
    let use_case = VotingStatusUseCase::new(state.ballot_repo.clone(), state.config.clone());
    let status = use_case.execute(&current.user.user_id).await?;

    let view = VoteView {
        user_name: current.user.user_name.into_inner(),
        first_name: current.user.first_name.as_str().to_string(),
        message: status.message,
        can_vote: status.can_vote,
        has_voted: status.has_voted,
        notices: flash.notices().to_vec(),
    };
    Ok(render_page(&flash, Json(view)))
}

/// POST /vote/
pub async fn cast_vote<A, B>(
    State(state): State<BallotAppState<A, B>>,
    current: CurrentUser,
    Form(form): Form<VoteForm>,
) -> BallotResult<Response>
where
    A: AuthStore,
    B: BallotStore,
{
    let use_case = CastVoteUseCase::new(state.ballot_repo.clone());

    match use_case
        .execute(&current.user.user_id, form.candidate.as_deref())
        .await
    {
        Ok(CastVoteOutcome::Recorded(_)) => Ok(FlashRedirect::to(VOTE_PATH)
            .with_notice(Notice::success(NOTICE_VOTE_RECORDED))
            .into_response()),
        Ok(CastVoteOutcome::Skipped) => Ok(FlashRedirect::to(VOTE_PATH).into_response()),
        Err(e) => redirect_with_notice(e, VOTE_PATH),
    }
}

// ============================================================================
// Admin
// ============================================================================

/// GET /root/
pub async fn admin_page<A, B>(
    State(state): State<BallotAppState<A, B>>,
    Query(query): Query<AdminQuery>,
    flash: IncomingFlash,
) -> BallotResult<Response>
where
    A: AuthStore,
    B: BallotStore,
{
    let query = DashboardQuery {
        keyword: query.keyword,
        only_authorized: is_checked(query.only_authorized.as_deref()),
    };

    let use_case = AdminDashboardUseCase::new(
        state.auth_repo.clone(),
        state.ballot_repo.clone(),
        state.config.clone(),
    );
    let dashboard = use_case.execute(&query).await?;

    let view = AdminView {
        message: dashboard.message,
        results: dashboard.tally,
        total_votes: dashboard.total_votes,
        keyword: query.keyword().unwrap_or_default().to_string(),
        only_authorized: query.only_authorized,
        searched: dashboard.searched,
        users: dashboard.users,
        notices: flash.notices().to_vec(),
    };
    Ok(render_page(&flash, Json(view)))
}

/// POST /root/
pub async fn admin_submit<A, B>(
    State(state): State<BallotAppState<A, B>>,
    headers: HeaderMap,
    Form(form): Form<AdminForm>,
) -> BallotResult<Response>
where
    A: AuthStore,
    B: BallotStore,
{
    let action = match form.action.as_deref() {
        Some("search_user") => {
            let location = search_location(
                form.keyword.as_deref(),
                is_checked(form.only_authorized.as_deref()),
            );
            return Ok(FlashRedirect::to(location).into_response());
        }
        Some("update_message") => form.message.map(AdminAction::UpdateMessage),
        Some("grant_permission") => target(&form).map(AdminAction::GrantPermission),
        Some("revoke_permission") => target(&form).map(AdminAction::RevokePermission),
        Some("void_vote") => target(&form).map(AdminAction::VoidVote),
        Some("reset_votes") => Some(AdminAction::ResetVotes),
        Some("reset_permissions") => Some(AdminAction::ResetPermissions),
        other => {
            tracing::debug!(action = ?other, "Unknown admin action");
            None
        }
    };

    let notice = match action {
        Some(action) => {
            let use_case = AdminActionsUseCase::new(state.ballot_repo.clone(), state.config.clone());
            use_case.execute(action).await?
        }
        None => None,
    };

    Ok(FlashRedirect::to(admin_return_path(&headers))
        .with_notices(notice)
        .into_response())
}

fn target(form: &AdminForm) -> Option<UserId> {
    form.user_id
        .as_deref()
        .and_then(|id| UserId::parse_str(id.trim()))
}

/// `/root/` with the search echoed in the query string
pub(crate) fn search_location(keyword: Option<&str>, only_authorized: bool) -> String {
    let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
    if keyword.is_none() && !only_authorized {
        return ADMIN_PATH.to_string();
    }

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(keyword) = keyword {
        query.append_pair("keyword", keyword);
    }
    if only_authorized {
        query.append_pair("only_authorized", "true");
    }
    format!("{ADMIN_PATH}?{}", query.finish())
}

/// Referring admin page (path and query), else `/root/`
///
/// Only same-host referers under the admin surface are honored.
pub(crate) fn admin_return_path(headers: &HeaderMap) -> String {
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| same_site_admin_path(referer, host))
        .unwrap_or_else(|| ADMIN_PATH.to_string())
}

fn same_site_admin_path(referer: &str, host: Option<&str>) -> Option<String> {
    let url = Url::parse(referer).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let authority = match url.port() {
        Some(port) => format!("{}:{port}", url.host_str()?),
        None => url.host_str()?.to_string(),
    };
    if host.is_some_and(|h| !h.eq_ignore_ascii_case(&authority)) {
        return None;
    }

    if !url.path().starts_with(ADMIN_PATH) {
        return None;
    }

    Some(match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(referer: &str, host: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, HeaderValue::from_str(referer).unwrap());
        if let Some(host) = host {
            headers.insert(header::HOST, HeaderValue::from_static(host));
        }
        headers
    }

    #[test]
    fn test_search_location() {
        assert_eq!(search_location(None, false), "/root/");
        assert_eq!(search_location(Some("  "), false), "/root/");
        assert_eq!(search_location(Some("ali"), false), "/root/?keyword=ali");
        assert_eq!(
            search_location(Some("a&b c"), true),
            "/root/?keyword=a%26b+c&only_authorized=true"
        );
        assert_eq!(search_location(None, true), "/root/?only_authorized=true");
    }

    #[test]
    fn test_admin_referer_honored() {
        let h = headers("http://vote.local:8000/root/?keyword=ali", Some("vote.local:8000"));
        assert_eq!(admin_return_path(&h), "/root/?keyword=ali");

        let h = headers("https://vote.local/root/", None);
        assert_eq!(admin_return_path(&h), "/root/");
    }

    #[test]
    fn test_foreign_or_non_admin_referer_ignored() {
        let h = headers("http://evil.example/root/?x=1", Some("vote.local"));
        assert_eq!(admin_return_path(&h), "/root/");

        let h = headers("http://vote.local/vote/", Some("vote.local"));
        assert_eq!(admin_return_path(&h), "/root/");

        let h = headers("http://vote.local/root/../vote/", Some("vote.local"));
        assert_eq!(admin_return_path(&h), "/root/");

        let h = headers("javascript:alert(1)", None);
        assert_eq!(admin_return_path(&h), "/root/");

        assert_eq!(admin_return_path(&HeaderMap::new()), "/root/");
    }
}
