use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    error::AuthError,
    models::{Credentials, LoginOutcome, Modal, RegisterRequest, RegisterResponse},
    session::SessionState,
};

/// AuthContext
///
/// The UI-facing side of authentication: which auth dialog is open, the
/// derived login flags the header reads, and the path a guard asked us to
/// return to after the visitor logs in.
pub struct AuthContext {
    session: SessionState,
    modal: Mutex<Modal>,
    redirect_target: Mutex<Option<String>>,
}

pub type AuthContextState = Arc<AuthContext>;

impl AuthContext {
    pub fn new(session: SessionState) -> Self {
        Self {
            session,
            modal: Mutex::new(Modal::Hidden),
            redirect_target: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    // --- Modal ---

    pub fn modal(&self) -> Modal {
        *self.modal.lock()
    }

    pub fn open_login_modal(&self) {
        *self.modal.lock() = Modal::Login;
    }

    pub fn open_register_modal(&self) {
        *self.modal.lock() = Modal::Register;
    }

    pub fn close_modal(&self) {
        *self.modal.lock() = Modal::Hidden;
    }

    // --- Derived flags ---

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// Logged in, and the startup check against the auth API has finished.
    pub fn is_authenticated(&self) -> bool {
        let session = self.session.snapshot();
        session.is_logged_in && !session.is_initializing
    }

    // --- Post-login redirect ---

    pub fn remember_redirect(&self, path: impl Into<String>) {
        let path = path.into();
        tracing::debug!(path = %path, "remembering post-login redirect");
        *self.redirect_target.lock() = Some(path);
    }

    pub fn redirect_target(&self) -> Option<String> {
        self.redirect_target.lock().clone()
    }

    // --- Operations ---

    /// submit_login
    ///
    /// Login from the modal. On success the modal closes and the recorded
    /// redirect target (if any) is handed back and forgotten. On failure the
    /// modal stays open so the error can be shown in place.
    pub async fn submit_login(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        let session = self.session.login(credentials).await?;
        self.close_modal();
        let navigate_to = self.redirect_target.lock().take();
        Ok(LoginOutcome {
            session,
            navigate_to,
        })
    }

    /// submit_register
    ///
    /// A successful registration flips the dialog over to login.
    pub async fn submit_register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegisterResponse, AuthError> {
        let response = self.session.register(request).await?;
        self.open_login_modal();
        Ok(response)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.close_modal();
        self.redirect_target.lock().take();
        self.session.logout().await
    }
}
