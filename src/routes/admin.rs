use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// The admin center, reachable with role 1 only. `create_router` wraps this
/// router in the `GuardDirective::admin()` layer, which sends anonymous and
/// role-0 visitors alike to `/403`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        // Admin center overview.
        .route("/admin", get(handlers::admin_page))
        // GET /admin/{section}
        // Moderation sections: articles, users, comments, tags.
        .route("/admin/{section}", get(handlers::admin_section_page))
}
