//! Auth Middleware
//!
//! `load_session` resolves the session cookie once per request and stores an
//! [`AuthStatus`] in the request extensions; `require_user` and
//! `require_superuser` gate routes on it.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::SessionId;
use crate::error::AuthError;
use crate::presentation::cookie::{clear_session_cookie, session_token, sets_session_cookie};

/// Where unauthenticated visitors are sent
pub const LOGIN_PATH: &str = "/";

/// Middleware state
pub struct AuthMiddlewareState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for AuthMiddlewareState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// The signed-in user of the current request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: SessionId,
    pub user: User,
}

impl CurrentUser {
    pub fn is_superuser(&self) -> bool {
        self.user.is_superuser()
    }
}

/// Authentication status stored in request extensions
#[derive(Debug, Clone, Default)]
pub struct AuthStatus {
    pub current: Option<CurrentUser>,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}

impl<S> FromRequestParts<S> for AuthStatus
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<AuthStatus>().cloned().unwrap_or_default())
    }
}

/// Rejects anonymous requests with a redirect to the landing page
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthStatus>()
            .and_then(|status| status.current.clone())
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}

/// Resolve the session cookie into an [`AuthStatus`]
///
/// Invalid or expired tokens make the request anonymous and the cookie is
/// cleared on the way out, unless the handler set a new one.
pub async fn load_session<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let token = session_token(req.headers(), &state.config);

    let mut stale_cookie = false;
    let current = match token {
        Some(token) => {
            let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
            match use_case.execute(&token).await {
                Ok(active) => Some(CurrentUser {
                    session_id: active.session_id,
                    user: active.user,
                }),
                Err(AuthError::SessionInvalid) => {
                    tracing::debug!("Ignoring invalid session cookie");
                    stale_cookie = true;
                    None
                }
                Err(e) => return e.into_response(),
            }
        }
        None => None,
    };

    req.extensions_mut().insert(AuthStatus { current });

    let mut response = next.run(req).await;

    if stale_cookie && !sets_session_cookie(response.headers(), &state.config) {
        if let Some(clear) = clear_session_cookie(&state.config) {
            response.headers_mut().append(header::SET_COOKIE, clear);
        }
    }

    response
}

/// Any signed-in user; anonymous requests are redirected to [`LOGIN_PATH`]
pub async fn require_user(status: AuthStatus, req: Request, next: Next) -> Response {
    if !status.is_authenticated() {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    next.run(req).await
}

/// Superusers only; anonymous ⇒ redirect, other users ⇒ 403
pub async fn require_superuser(status: AuthStatus, req: Request, next: Next) -> Response {
    match status.current {
        None => Redirect::to(LOGIN_PATH).into_response(),
        Some(current) if !current.is_superuser() => {
            tracing::warn!(user_id = %current.user.user_id, "Admin surface denied");
            AuthError::Forbidden.into_response()
        }
        Some(_) => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session::{issue_token, open_session};
    use crate::domain::value_object::{
        first_name::FirstName, user_name::UserName, user_role::UserRole,
    };
    use crate::infra::memory::MemoryAuthRepository;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::middleware::{from_fn, from_fn_with_state};
    use axum::routing::get;
    use tower::ServiceExt;

    struct Fixture {
        repo: Arc<MemoryAuthRepository>,
        config: Arc<AuthConfig>,
        app: Router,
    }

    async fn whoami(status: AuthStatus) -> String {
        status
            .current
            .map(|c| c.user.user_name.into_inner())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MemoryAuthRepository::new());
        let config = Arc::new(AuthConfig::development());
        let state = AuthMiddlewareState::new(repo.clone(), config.clone());

        let app = Router::new()
            .route("/", get(whoami))
            .merge(
                Router::new()
                    .route("/vote/", get(whoami))
                    .route_layer(from_fn(require_user)),
            )
            .merge(
                Router::new()
                    .route("/root/", get(whoami))
                    .route_layer(from_fn(require_superuser)),
            )
            .layer(from_fn_with_state(state, load_session::<MemoryAuthRepository>));

        Fixture { repo, config, app }
    }

    async fn login(f: &Fixture, name: &str, role: UserRole) -> String {
        let user = User::with_role(UserName::new(name).unwrap(), FirstName::default(), role);
        UserRepository::create(f.repo.as_ref(), &user).await.unwrap();
        open_session(f.repo.as_ref(), &f.config, &user, None)
            .await
            .unwrap()
    }

    fn get_with_cookie(path: &str, cookie: Option<String>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri(path);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, format!("ballot_session={c}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        use http_body_util::BodyExt;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_redirected_from_protected_routes() {
        let f = fixture();
        for path in ["/vote/", "/root/"] {
            let response = f.app.clone().oneshot(get_with_cookie(path, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[header::LOCATION], "/");
        }
    }

    #[tokio::test]
    async fn test_voter_session_resolves() {
        let f = fixture();
        let token = login(&f, "alice", UserRole::Voter).await;

        let response = f
            .app
            .clone()
            .oneshot(get_with_cookie("/vote/", Some(token.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "alice");

        let response = f
            .app
            .clone()
            .oneshot(get_with_cookie("/root/", Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_superuser_reaches_admin() {
        let f = fixture();
        let token = login(&f, "root", UserRole::Superuser).await;
        let response = f
            .app
            .clone()
            .oneshot(get_with_cookie("/root/", Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "root");
    }

    #[tokio::test]
    async fn test_stale_cookie_is_cleared() {
        let f = fixture();
        let token = issue_token(&f.config, &SessionId::new());
        let response = f
            .app
            .clone()
            .oneshot(get_with_cookie("/", Some(token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("ballot_session=;"));
        assert!(set_cookie.contains("Max-Age=0"));
        assert_eq!(body_text(response).await, "anonymous");
    }
}
