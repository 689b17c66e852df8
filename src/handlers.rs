use crate::{
    AppState,
    error::AuthError,
    models::{
        Credentials, LoginOutcome, ModalView, PageView, RegisterRequest, RegisterResponse,
        SearchUpdate, SearchView, Session, ThemeView,
    },
    search::SearchParams,
};
use axum::{
    Json,
    extract::{Path, State, rejection::QueryRejection},
    http::{StatusCode, Uri},
};

/// page
///
/// Common view model for every page route.
fn page(state: &AppState, name: &str) -> Json<PageView> {
    Json(PageView {
        page: name.to_string(),
        session: state.session.snapshot(),
        modal: state.auth.modal(),
        theme: state.theme.current(),
    })
}

// --- Public Pages ---

/// home_page
///
/// [Public Route] The reader feed.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Home feed", body = PageView))
)]
pub async fn home_page(State(state): State<AppState>) -> Json<PageView> {
    page(&state, "home")
}

/// search_page
///
/// [Public Route] Search results. The visible URL is the source of truth on
/// entry, so the store is synced from it before rendering.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Search state", body = SearchView),
        (status = 400, description = "Malformed query string")
    )
)]
pub async fn search_page(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<SearchView>, QueryRejection> {
    state.search.sync_from_uri(&uri)?;
    Ok(Json(SearchView {
        query: state.search.query(),
        location: state.search.location(),
        changed: false,
    }))
}

/// login_required_page
///
/// [Public Route] Landing page for guard denials that need a login. Opens the
/// login dialog so the visitor can sign in and be sent back.
#[utoipa::path(
    get,
    path = "/400",
    responses((status = 200, description = "Login prompt", body = PageView))
)]
pub async fn login_required_page(State(state): State<AppState>) -> Json<PageView> {
    if !state.auth.is_logged_in() {
        state.auth.open_login_modal();
    }
    page(&state, "login-required")
}

/// forbidden_page
///
/// [Public Route] Landing page for insufficient-role denials.
#[utoipa::path(
    get,
    path = "/403",
    responses((status = 200, description = "Forbidden", body = PageView))
)]
pub async fn forbidden_page(State(state): State<AppState>) -> Json<PageView> {
    page(&state, "forbidden")
}

// --- Session & Auth API ---

/// get_session
///
/// [Public Route] Current session snapshot, for the header/nav.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Session", body = Session))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.session.snapshot())
}

/// login
///
/// [Public Route] Modal login. Answers with the new session and, when a guard
/// had turned the visitor away, the path to go back to.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = LoginOutcome),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Auth service unavailable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginOutcome>, AuthError> {
    let outcome = state.auth.submit_login(&credentials).await?;
    Ok(Json(outcome))
}

/// register
///
/// [Public Route] Account creation from the register dialog.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = RegisterResponse),
        (status = 400, description = "Rejected")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AuthError> {
    let response = state.auth.submit_register(&request).await?;
    Ok(Json(response))
}

/// logout
///
/// [Public Route] Always clears the local session. A failed remote
/// invalidation is still reported as 502.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 502, description = "Logged out locally, remote call failed")
    )
)]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, AuthError> {
    state.auth.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

fn modal_view(state: &AppState) -> Json<ModalView> {
    Json(ModalView {
        modal: state.auth.modal(),
    })
}

#[utoipa::path(
    post,
    path = "/api/auth/modal/login",
    responses((status = 200, description = "Login dialog open", body = ModalView))
)]
pub async fn open_login_modal(State(state): State<AppState>) -> Json<ModalView> {
    state.auth.open_login_modal();
    modal_view(&state)
}

#[utoipa::path(
    post,
    path = "/api/auth/modal/register",
    responses((status = 200, description = "Register dialog open", body = ModalView))
)]
pub async fn open_register_modal(State(state): State<AppState>) -> Json<ModalView> {
    state.auth.open_register_modal();
    modal_view(&state)
}

#[utoipa::path(
    post,
    path = "/api/auth/modal/close",
    responses((status = 200, description = "Dialog closed", body = ModalView))
)]
pub async fn close_modal(State(state): State<AppState>) -> Json<ModalView> {
    state.auth.close_modal();
    modal_view(&state)
}

// --- Search & Theme API ---

/// update_search
///
/// [Public Route] Store-to-URL direction. A blank keyword is ignored; the
/// response carries the location the client should show.
#[utoipa::path(
    patch,
    path = "/api/search",
    request_body = SearchUpdate,
    responses((status = 200, description = "Search state", body = SearchView))
)]
pub async fn update_search(
    State(state): State<AppState>,
    Json(update): Json<SearchUpdate>,
) -> Json<SearchView> {
    let mut changed = false;
    if let Some(keyword) = update.keyword.as_deref() {
        changed |= state.search.set_keyword(keyword);
    }
    if let Some(tag) = update.tag.as_deref() {
        changed |= state.search.set_tag(Some(tag));
    }
    if let Some(sort) = update.sort {
        changed |= state.search.set_sort(sort);
    }
    Json(SearchView {
        query: state.search.query(),
        location: state.search.location(),
        changed,
    })
}

#[utoipa::path(
    get,
    path = "/api/theme",
    responses((status = 200, description = "Theme", body = ThemeView))
)]
pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeView> {
    Json(ThemeView {
        theme: state.theme.current(),
    })
}

#[utoipa::path(
    put,
    path = "/api/theme",
    request_body = ThemeView,
    responses((status = 200, description = "Theme", body = ThemeView))
)]
pub async fn set_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeView>,
) -> Json<ThemeView> {
    let theme = state.theme.set(payload.theme).await;
    Json(ThemeView { theme })
}

// --- Guarded Pages ---

/// account_page
///
/// [Authenticated Route] The visitor's account center.
#[utoipa::path(
    get,
    path = "/account",
    responses(
        (status = 200, description = "Account center", body = PageView),
        (status = 303, description = "Redirect to /400")
    )
)]
pub async fn account_page(State(state): State<AppState>) -> Json<PageView> {
    page(&state, "account")
}

/// creator_page
///
/// [Authenticated Route] Creator dashboard.
#[utoipa::path(
    get,
    path = "/creator",
    responses(
        (status = 200, description = "Creator dashboard", body = PageView),
        (status = 303, description = "Redirect to /400")
    )
)]
pub async fn creator_page(State(state): State<AppState>) -> Json<PageView> {
    page(&state, "creator")
}

#[utoipa::path(
    get,
    path = "/editor",
    responses(
        (status = 200, description = "Article editor", body = PageView),
        (status = 303, description = "Redirect to /400")
    )
)]
pub async fn editor_page(State(state): State<AppState>) -> Json<PageView> {
    page(&state, "editor")
}

/// admin_page
///
/// [Admin Route] Admin center landing page.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Admin center", body = PageView),
        (status = 303, description = "Redirect to /403")
    )
)]
pub async fn admin_page(State(state): State<AppState>) -> Json<PageView> {
    page(&state, "admin")
}

/// admin_section_page
///
/// [Admin Route] A section of the admin center (articles, users, comments...).
#[utoipa::path(
    get,
    path = "/admin/{section}",
    params(("section" = String, Path, description = "Admin section")),
    responses(
        (status = 200, description = "Admin section", body = PageView),
        (status = 303, description = "Redirect to /403")
    )
)]
pub async fn admin_section_page(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Json<PageView> {
    page(&state, &format!("admin/{}", section))
}
