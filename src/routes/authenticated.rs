use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Pages for any logged-in visitor, role 0 or above. `create_router` wraps
/// this router in the `GuardDirective::authenticated()` layer: anonymous
/// visitors are redirected to `/400` and the requested path is remembered so
/// the login dialog can bring them back.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /account
        // The visitor's account center (profile, bookmarks, history).
        .route("/account", get(handlers::account_page))
        // GET /creator
        // Creator dashboard: the author's articles and their stats.
        .route("/creator", get(handlers::creator_page))
        // GET /editor
        // Article editor.
        .route("/editor", get(handlers::editor_page))
}
