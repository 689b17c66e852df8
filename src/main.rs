use press_portal::{
    AppState,
    auth::{AuthApiState, HttpAuthApi, MockAuthApi},
    config::{AppConfig, Env},
    create_router,
    storage::{FileStorage, StorageState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, wires the auth client and client
/// storage into the stores, starts session initialization and serves the shell.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "press_portal=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Shell starting in {:?} mode", config.env);

    // 3. Client Storage
    let storage = Arc::new(FileStorage::new(config.storage_path.clone())) as StorageState;
    tracing::info!("Client storage at {}", config.storage_path.display());

    // 4. Auth API (real service, or the in-process mock for local runs)
    let api = match &config.auth_api_url {
        Some(url) => {
            tracing::info!("Using auth service at {}", url);
            match HttpAuthApi::new(url.clone(), config.auth_api_timeout) {
                Ok(api) => Arc::new(api) as AuthApiState,
                Err(e) => {
                    tracing::error!("FATAL: could not build the auth client: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            tracing::warn!("AUTH_API_URL not set, using the mock auth API");
            Arc::new(
                MockAuthApi::new(config.jwt_secret.clone())
                    .with_latency(config.mock_latency)
                    .with_storage(storage.clone()),
            ) as AuthApiState
        }
    };

    // 5. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::build(config, api, storage);
    app_state.theme.load().await;

    // 6. Session Initialization (exactly once, in the background)
    app_state.session.start_initialization();

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("FATAL: could not bind {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}
