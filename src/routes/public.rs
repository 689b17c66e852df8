use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Public Router Module
///
/// Pages and endpoints that never pass through a guard. The session-mutating
/// endpoints live here because an anonymous visitor must be able to log in.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe.
        .route("/health", get(|| async { "ok" }))
        // --- Pages ---
        .route("/", get(handlers::home_page))
        // GET /search?q=...&tag=...&sort=...
        // Syncs the search store from the URL before answering.
        .route("/search", get(handlers::search_page))
        // GET /400
        // "Please log in" landing page; opens the login dialog.
        .route("/400", get(handlers::login_required_page))
        // GET /403
        // "Not allowed" landing page.
        .route("/403", get(handlers::forbidden_page))
        // --- Session & Auth ---
        .route("/api/session", get(handlers::get_session))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/modal/login", post(handlers::open_login_modal))
        .route("/api/auth/modal/register", post(handlers::open_register_modal))
        .route("/api/auth/modal/close", post(handlers::close_modal))
        // --- Search & Theme ---
        // PATCH /api/search
        // Store-to-URL direction; blank keywords are ignored.
        .route("/api/search", patch(handlers::update_search))
        .route(
            "/api/theme",
            get(handlers::get_theme).put(handlers::set_theme),
        )
}
