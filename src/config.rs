use std::{env, path::PathBuf, time::Duration};

const LOCAL_JWT_SECRET: &str = "press-portal-local-mock-secret";

/// AppConfig
///
/// The shell's entire configuration, loaded once at startup and cloned into
/// `AppState`. Read-only afterwards.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects mock vs. real auth and the log format.
    pub env: Env,
    // Socket address the shell listens on.
    pub bind_addr: String,
    // Base URL of the auth service. `None` means the in-process mock is used.
    pub auth_api_url: Option<String>,
    // Upper bound on every request to the auth service.
    pub auth_api_timeout: Duration,
    // Secret the mock auth API signs its tokens with.
    pub jwt_secret: String,
    // JSON file backing client storage (token, identity record, theme).
    pub storage_path: PathBuf,
    // Artificial delay applied by the mock auth API.
    pub mock_latency: Duration,
    // How long a guarded route waits for session initialization before
    // answering 503.
    pub guard_wait: Duration,
}

/// Env
///
/// Local runs may fall back to the mock auth API; production must point at a
/// real one.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration for tests: mock auth, no latency.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            auth_api_url: None,
            auth_api_timeout: Duration::from_secs(10),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            storage_path: PathBuf::from(".press-portal/storage.json"),
            mock_latency: Duration::ZERO,
            guard_wait: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every setting from the environment (call `dotenv` first).
    ///
    /// # Panics
    /// Panics in production when `AUTH_API_URL` is missing, and on malformed
    /// numeric settings, so a misconfigured shell never starts.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = env::var("PORTAL_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let storage_path = env::var("CLIENT_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".press-portal/storage.json"));
        let guard_wait = Duration::from_millis(millis_var("GUARD_WAIT_MS", 5000));
        let auth_api_timeout = Duration::from_millis(millis_var("AUTH_API_TIMEOUT_MS", 10_000));

        match env {
            Env::Local => Self {
                env: Env::Local,
                bind_addr,
                auth_api_url: env::var("AUTH_API_URL").ok().filter(|u| !u.is_empty()),
                auth_api_timeout,
                jwt_secret: env::var("JWT_SECRET")
                    .unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
                storage_path,
                mock_latency: Duration::from_millis(millis_var("MOCK_LATENCY_MS", 300)),
                guard_wait,
            },
            Env::Production => Self {
                env: Env::Production,
                bind_addr,
                auth_api_url: Some(
                    env::var("AUTH_API_URL").expect("FATAL: AUTH_API_URL required in prod"),
                ),
                auth_api_timeout,
                // Only the mock auth API signs tokens.
                jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
                storage_path,
                mock_latency: Duration::ZERO,
                guard_wait,
            },
        }
    }

    pub fn uses_mock_auth(&self) -> bool {
        self.auth_api_url.is_none()
    }
}

fn millis_var(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("FATAL: {name} must be a number of milliseconds")),
        Err(_) => default,
    }
}
