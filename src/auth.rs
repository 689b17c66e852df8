use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use parking_lot::RwLock;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use uuid::Uuid;

use crate::{
    error::AuthError,
    models::{Credentials, LoginResponse, RegisterRequest, RegisterResponse, Role, User},
    storage::{StorageState, USER_KEY},
};

// 1. AuthApi Contract
/// AuthApi
///
/// The remote auth collaborator. The session store only ever talks to this
/// trait, so the HTTP client (`HttpAuthApi`) and the in-process stand-in
/// (`MockAuthApi`) are interchangeable without touching session or guard logic.
///
/// Errors are reported through `AuthError`; "no current user" is `Ok(None)`,
/// not an error.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError>;

    /// Invalidates the token remotely. `Ok(false)` means the backend did not
    /// acknowledge the logout.
    async fn logout(&self, token: Option<&str>) -> Result<bool, AuthError>;

    async fn current_user(&self, token: Option<&str>) -> Result<Option<User>, AuthError>;
}

/// AuthApiState
///
/// The concrete type used to share the auth client across the application state.
pub type AuthApiState = Arc<dyn AuthApi>;

/// avatar_url_for
///
/// Stable per-identity avatar, seeded from the user id.
pub fn avatar_url_for(id: Uuid) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", id)
}

// 2. The Real Implementation (HTTP)
/// HttpAuthApi
///
/// Talks to the platform's auth service over HTTP. All paths are relative to
/// the configured `AUTH_API_URL`; the token travels as a bearer header.
///
/// Every request is bounded by `timeout`. A stalled service surfaces as
/// `NetworkFailure` instead of leaving the caller waiting.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network(err: reqwest::Error) -> AuthError {
    AuthError::NetworkFailure(err.to_string())
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(network)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::InvalidCredentials)
            }
            status if !status.is_success() => Err(AuthError::NetworkFailure(format!(
                "login returned {}",
                status
            ))),
            _ => response.json::<LoginResponse>().await.map_err(network),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await
            .map_err(network)?;

        // The service answers 4xx with a `{success: false, message}` body for
        // rejected registrations; only fall back to a network error when the
        // body is not that shape.
        let status = response.status();
        match response.json::<RegisterResponse>().await {
            Ok(body) => Ok(body),
            Err(e) if status.is_success() => Err(network(e)),
            Err(_) => Err(AuthError::NetworkFailure(format!(
                "register returned {}",
                status
            ))),
        }
    }

    async fn logout(&self, token: Option<&str>) -> Result<bool, AuthError> {
        let mut request = self.client.post(self.url("/auth/logout"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(network)?;
        Ok(response.status().is_success())
    }

    async fn current_user(&self, token: Option<&str>) -> Result<Option<User>, AuthError> {
        let Some(token) = token else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(network)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(None),
            status if !status.is_success() => Err(AuthError::NetworkFailure(format!(
                "current user returned {}",
                status
            ))),
            _ => response.json::<User>().await.map(Some).map_err(network),
        }
    }
}

// 3. The Mock Implementation (Local Development & Tests)
/// Claims
///
/// Payload of the tokens issued by `MockAuthApi`. Signed with the configured
/// secret and validated on every `current_user` call.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the id of the identity the token was issued to.
    pub sub: Uuid,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

const TOKEN_TTL_DAYS: i64 = 7;

struct Account {
    password: String,
    user: User,
}

/// MockAuthApi
///
/// In-process auth backend used when no `AUTH_API_URL` is configured, and by
/// the test suites. It simulates network latency, issues real HS256 tokens and
/// falls back to the `user` record in client storage when the token cannot be
/// resolved.
///
/// Seeded accounts: `reader` / `reader123` (role 0), `admin` / `admin123` (role 1).
pub struct MockAuthApi {
    accounts: RwLock<HashMap<String, Account>>,
    secret: String,
    latency: Duration,
    storage: Option<StorageState>,
    /// When true, every operation fails as if the network were down.
    should_fail: bool,
    fetches: AtomicUsize,
}

impl MockAuthApi {
    pub fn new(secret: impl Into<String>) -> Self {
        let mock = Self {
            accounts: RwLock::new(HashMap::new()),
            secret: secret.into(),
            latency: Duration::ZERO,
            storage: None,
            should_fail: false,
            fetches: AtomicUsize::new(0),
        };
        mock.seed("reader", "reader123", Uuid::from_u128(1), Role::Regular);
        mock.seed("admin", "admin123", Uuid::from_u128(2), Role::Admin);
        mock
    }

    pub fn new_failing(secret: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            ..Self::new(secret)
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Enables the storage fallback path of `current_user`.
    pub fn with_storage(mut self, storage: StorageState) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Number of `current_user` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Adds (or replaces) an account.
    pub fn seed(&self, username: &str, password: &str, id: Uuid, role: Role) {
        let user = User {
            id,
            username: username.to_string(),
            role,
            avatar_url: Some(avatar_url_for(id)),
        };
        self.accounts.write().insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                user,
            },
        );
    }

    /// Signs a token for `user_id`, valid for seven days.
    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: (now + ChronoDuration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
        };
        let key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &key)
            .map_err(|e| AuthError::NetworkFailure(format!("token signing failed: {e}")))
    }

    fn resolve_token(&self, token: &str) -> Option<User> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let data = match decode::<Claims>(token, &key, &validation) {
            Ok(data) => data,
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("mock auth: token expired"),
                    _ => tracing::debug!("mock auth: token rejected: {}", e),
                }
                return None;
            }
        };

        self.accounts
            .read()
            .values()
            .find(|account| account.user.id == data.claims.sub)
            .map(|account| account.user.clone())
    }

    async fn stored_user(&self) -> Option<User> {
        let storage = self.storage.as_ref()?;
        let raw = storage.get(USER_KEY).await.ok()??;
        serde_json::from_str(&raw).ok()
    }

    async fn simulate_network(&self) -> Result<(), AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.should_fail {
            return Err(AuthError::NetworkFailure(
                "mock auth: simulated outage".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        self.simulate_network().await?;

        let user = {
            let accounts = self.accounts.read();
            match accounts.get(&credentials.username) {
                Some(account) if account.password == credentials.password => {
                    account.user.clone()
                }
                _ => return Err(AuthError::InvalidCredentials),
            }
        };

        let token = self.issue_token(user.id)?;
        Ok(LoginResponse { user, token })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError> {
        self.simulate_network().await?;

        let username = request.username.trim();
        if username.len() < 3 {
            return Ok(RegisterResponse {
                success: false,
                message: "username must be at least 3 characters".to_string(),
            });
        }
        if request.password.len() < 6 {
            return Ok(RegisterResponse {
                success: false,
                message: "password must be at least 6 characters".to_string(),
            });
        }
        if self.accounts.read().contains_key(username) {
            return Ok(RegisterResponse {
                success: false,
                message: "username already taken".to_string(),
            });
        }

        self.seed(username, &request.password, Uuid::new_v4(), Role::Regular);
        Ok(RegisterResponse {
            success: true,
            message: "registration successful, please log in".to_string(),
        })
    }

    async fn logout(&self, _token: Option<&str>) -> Result<bool, AuthError> {
        self.simulate_network().await?;
        Ok(true)
    }

    async fn current_user(&self, token: Option<&str>) -> Result<Option<User>, AuthError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;

        if let Some(user) = token.and_then(|t| self.resolve_token(t)) {
            return Ok(Some(user));
        }
        // Token missing or unusable: fall back to the stored identity record.
        Ok(self.stored_user().await)
    }
}
