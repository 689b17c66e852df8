use axum::{
    Router,
    extract::{Request, State},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Collaborators and client-side state stores.
pub mod auth;
pub mod auth_context;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod search;
pub mod session;
pub mod storage;
pub mod theme;

// Route groups (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use auth::{AuthApi, AuthApiState, HttpAuthApi, MockAuthApi};
pub use auth_context::{AuthContext, AuthContextState};
pub use config::AppConfig;
pub use guard::{GuardDirective, GuardState, RouteGuard, decide};
pub use search::{SearchStore, SearchStoreState};
pub use session::{SessionState, SessionStore};
pub use storage::{ClientStorage, FileStorage, MemoryStorage, StorageState};
pub use theme::{ThemeStore, ThemeStoreState};

/// ApiDoc
///
/// OpenAPI description of the shell's pages and JSON endpoints, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home_page, handlers::search_page, handlers::login_required_page,
        handlers::forbidden_page, handlers::get_session, handlers::login, handlers::register,
        handlers::logout, handlers::open_login_modal, handlers::open_register_modal,
        handlers::close_modal, handlers::update_search, handlers::get_theme, handlers::set_theme,
        handlers::account_page, handlers::creator_page, handlers::editor_page,
        handlers::admin_page, handlers::admin_section_page
    ),
    components(
        schemas(
            models::User, models::Session, models::Credentials, models::RegisterRequest,
            models::RegisterResponse, models::Modal, models::Theme, models::SortOrder,
            models::SearchQuery, models::SearchUpdate, models::PageView, models::SearchView,
            models::LoginOutcome, models::ModalView, models::ThemeView,
        )
    ),
    tags(
        (name = "press-portal", description = "Blog platform presentation shell")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything a request handler may touch, shared by cheap `Arc` clones.
/// One `AppState` is one visitor's client runtime: a single session, modal,
/// search and theme state.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub auth: AuthContextState,
    pub search: SearchStoreState,
    pub theme: ThemeStoreState,
    pub config: AppConfig,
}

impl AppState {
    /// build
    ///
    /// Wires the stores around the injected auth client and client storage.
    pub fn build(config: AppConfig, api: AuthApiState, storage: StorageState) -> Self {
        let session = Arc::new(SessionStore::new(api, storage.clone()));
        let auth = Arc::new(AuthContext::new(session.clone()));
        Self {
            session,
            auth,
            search: Arc::new(SearchStore::new()),
            theme: Arc::new(ThemeStore::new(storage)),
            config,
        }
    }
}

/// require_authenticated
///
/// Route layer for the reader/creator pages: any logged-in role passes,
/// everyone else is sent to `/400`.
async fn require_authenticated(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    guard::enforce(&state, GuardDirective::authenticated(), request, next).await
}

/// require_admin
///
/// Route layer for the admin center: role 1 only, everyone else to `/403`.
async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    guard::enforce(&state, GuardDirective::admin(), request, next).await
}

/// create_router
///
/// Assembles the page and API routes, puts each protected group behind its
/// guard layer and adds the request-id/tracing/CORS stack.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_authenticated,
            )),
        )
        .merge(
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, correlated by the generated `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
