use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use tokio::sync::watch;

use crate::{
    auth::AuthApiState,
    error::AuthError,
    models::{Credentials, RegisterRequest, RegisterResponse, Session, User},
    storage::{StorageState, TOKEN_KEY, USER_KEY},
};

/// SessionStore
///
/// Sole owner of the visitor's `Session`. Built once per shell (or per test)
/// and shared as `SessionState`; readers get snapshots or a `watch` receiver.
///
/// Ordering rules:
/// - `initialize_auth` runs its fetch at most once per store.
/// - Every `login`/`logout` bumps `generation`. An initialization response
///   that comes back under an older generation is discarded, so a slow
///   startup fetch can never resurrect a session the visitor already left.
pub struct SessionStore {
    api: AuthApiState,
    storage: StorageState,
    state: watch::Sender<Session>,
    init_started: AtomicBool,
    generation: AtomicU64,
}

/// SessionState
///
/// The shared handle type placed in `AppState`.
pub type SessionState = Arc<SessionStore>;

impl SessionStore {
    pub fn new(api: AuthApiState, storage: StorageState) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            api,
            storage,
            state,
            init_started: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Current read-only view of the session.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in
    }

    pub fn is_initializing(&self) -> bool {
        self.state.borrow().is_initializing
    }

    /// Resolves once `is_initializing` is false.
    pub async fn wait_initialized(&self) -> Session {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`.
        match rx.wait_for(|session| !session.is_initializing).await {
            Ok(session) => session.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// initialize_auth
    ///
    /// Restores the session from the stored token. Only the first call does
    /// anything; later calls return immediately whether or not the first one
    /// has finished (use `wait_initialized` to await the outcome).
    ///
    /// Failures are swallowed: the session ends up logged out, and
    /// `is_initializing` is cleared in every case.
    pub async fn initialize_auth(&self) {
        if self.init_started.swap(true, Ordering::SeqCst) {
            tracing::trace!("initialize_auth already started, skipping");
            return;
        }

        let ticket = self.generation.load(Ordering::SeqCst);
        let token = match self.storage.get(TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("session: could not read stored token: {}", e);
                None
            }
        };

        let fetched = match self.api.current_user(token.as_deref()).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("session: initialization failed, continuing logged out: {}", e);
                None
            }
        };

        self.state.send_modify(|session| {
            if self.generation.load(Ordering::SeqCst) == ticket {
                session.is_logged_in = fetched.is_some();
                session.user = fetched;
            } else {
                tracing::debug!("session: discarding stale initialization response");
            }
            session.is_initializing = false;
        });

        let session = self.snapshot();
        tracing::info!(
            logged_in = session.is_logged_in,
            user = session.username().unwrap_or("-"),
            "session initialized"
        );
    }

    /// start_initialization
    ///
    /// Runs `initialize_auth` on a background task unless it has already been
    /// started. The fetch then completes even if the caller stops waiting.
    pub fn start_initialization(self: &Arc<Self>) {
        if self.init_started.load(Ordering::SeqCst) {
            return;
        }
        let store = Arc::clone(self);
        tokio::spawn(async move { store.initialize_auth().await });
    }

    /// login
    ///
    /// Exchanges credentials for an identity. The session is replaced and the
    /// token persisted only on success; on failure nothing changes.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(username = %credentials.username, "login failed: {}", e);
                return Err(e);
            }
        };

        self.generation.fetch_add(1, Ordering::SeqCst);
        self.persist(&response.token, &response.user).await;

        let user = response.user;
        tracing::info!(username = %user.username, role = u8::from(user.role), "logged in");
        self.state.send_modify(|session| {
            session.user = Some(user);
            session.is_logged_in = true;
        });

        Ok(self.snapshot())
    }

    /// register
    ///
    /// Creates an account. Does not log the visitor in; a `success: false`
    /// answer is surfaced as `RegistrationRejected`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError> {
        let response = self.api.register(request).await?;
        if !response.success {
            return Err(AuthError::RegistrationRejected(response.message));
        }
        tracing::info!(username = %request.username, "registered");
        Ok(response)
    }

    /// logout
    ///
    /// Clears the session and the stored token before telling the backend.
    /// Local state is always cleared; a failed remote call is still reported
    /// to the caller.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let token = self.storage.get(TOKEN_KEY).await.unwrap_or_else(|e| {
            tracing::warn!("session: could not read stored token: {}", e);
            None
        });

        self.state.send_modify(|session| {
            session.user = None;
            session.is_logged_in = false;
        });
        self.clear_persisted().await;
        tracing::info!("logged out");

        match self.api.logout(token.as_deref()).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!("session: backend did not acknowledge logout");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("session: remote logout failed: {}", e);
                Err(e)
            }
        }
    }

    async fn persist(&self, token: &str, user: &User) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token).await {
            tracing::warn!("session: could not persist token: {}", e);
        }
        match serde_json::to_string(user) {
            Ok(json) => {
                if let Err(e) = self.storage.set(USER_KEY, &json).await {
                    tracing::warn!("session: could not persist user record: {}", e);
                }
            }
            Err(e) => tracing::warn!("session: could not serialize user record: {}", e),
        }
    }

    async fn clear_persisted(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!("session: could not clear {}: {}", key, e);
            }
        }
    }
}
