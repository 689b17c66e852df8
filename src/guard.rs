use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::{
    AppState,
    error::GuardDenied,
    models::{Role, Session},
    session::SessionState,
};

/// Redirect target for visitors who must log in first.
pub const LOGIN_REQUIRED_PATH: &str = "/400";
/// Redirect target for visitors whose role is too low.
pub const FORBIDDEN_PATH: &str = "/403";

/// GuardDirective
///
/// Per-route protection policy, fixed when the route table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardDirective {
    pub required_role: Role,
    pub redirect_path: String,
    /// Record the requested path so a later login can return there.
    pub remember_origin: bool,
}

impl GuardDirective {
    pub fn new(required_role: Role, redirect_path: impl Into<String>) -> Self {
        Self {
            required_role,
            redirect_path: redirect_path.into(),
            remember_origin: false,
        }
    }

    pub fn remembering_origin(mut self) -> Self {
        self.remember_origin = true;
        self
    }

    /// Any logged-in visitor; others are sent to `/400` and brought back
    /// after logging in.
    pub fn authenticated() -> Self {
        Self::new(Role::Regular, LOGIN_REQUIRED_PATH).remembering_origin()
    }

    /// Administrators only; everyone else is sent to `/403`.
    pub fn admin() -> Self {
        Self::new(Role::Admin, FORBIDDEN_PATH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    pub reason: GuardDenied,
    pub redirect_path: String,
}

/// GuardState
///
/// `Pending` until the session has been initialized; `Allowed` and `Denied`
/// are terminal for a given mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    Pending,
    Allowed,
    Denied(Denial),
}

impl GuardState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, GuardState::Pending)
    }
}

/// decide
///
/// The whole guard policy, free of any rendering or routing concerns.
pub fn decide(session: &Session, directive: &GuardDirective) -> GuardState {
    if session.is_initializing {
        return GuardState::Pending;
    }

    let reason = match (session.is_logged_in, session.role()) {
        (true, Some(role)) if role.satisfies(directive.required_role) => {
            return GuardState::Allowed;
        }
        (true, Some(_)) => GuardDenied::InsufficientRole,
        _ => GuardDenied::Unauthenticated,
    };

    GuardState::Denied(Denial {
        reason,
        redirect_path: directive.redirect_path.clone(),
    })
}

/// RouteGuard
///
/// One guarded mount. Re-evaluates while pending and latches the first
/// resolved decision, so later session changes do not flip a mounted subtree.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    directive: GuardDirective,
    resolved: Option<GuardState>,
}

impl RouteGuard {
    pub fn new(directive: GuardDirective) -> Self {
        Self {
            directive,
            resolved: None,
        }
    }

    pub fn directive(&self) -> &GuardDirective {
        &self.directive
    }

    pub fn observe(&mut self, session: &Session) -> GuardState {
        if let Some(state) = &self.resolved {
            return state.clone();
        }
        let state = decide(session, &self.directive);
        if state.is_resolved() {
            self.resolved = Some(state.clone());
        }
        state
    }

    /// Starts initialization if nobody has yet, waits for it to finish, then
    /// decides.
    pub async fn resolve(&mut self, store: &SessionState) -> GuardState {
        if let Some(state) = &self.resolved {
            return state.clone();
        }
        store.start_initialization();
        let session = store.wait_initialized().await;
        self.observe(&session)
    }
}

/// enforce
///
/// HTTP adapter around `RouteGuard`. Makes sure initialization has been
/// kicked off, waits for it (bounded by `guard_wait`), and then either runs
/// the guarded handler or redirects. A guard still pending after the wait
/// answers `503` with `Retry-After`: nothing rendered, no redirect issued.
pub async fn enforce(
    state: &AppState,
    directive: GuardDirective,
    request: Request,
    next: Next,
) -> Response {
    let session = &state.session;

    let mut guard = RouteGuard::new(directive);
    let waited = tokio::time::timeout(state.config.guard_wait, guard.resolve(session)).await;
    let decision = match waited {
        Ok(decision) => decision,
        Err(_) => guard.observe(&session.snapshot()),
    };

    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match decision {
        GuardState::Allowed => next.run(request).await,
        GuardState::Denied(denial) => {
            tracing::info!(
                path = %path,
                reason = %denial.reason,
                redirect = %denial.redirect_path,
                "route guard denied"
            );
            if guard.directive().remember_origin {
                state.auth.remember_redirect(path);
            }
            Redirect::to(&denial.redirect_path).into_response()
        }
        GuardState::Pending => {
            tracing::warn!(path = %path, "route guard still pending, session not initialized");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, "1")],
            )
                .into_response()
        }
    }
}
