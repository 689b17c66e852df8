use press_portal::{
    auth::MockAuthApi,
    auth_context::AuthContext,
    error::AuthError,
    models::{Credentials, Modal, RegisterRequest},
    session::SessionStore,
    storage::MemoryStorage,
};
use std::sync::Arc;

async fn context() -> AuthContext {
    let session = Arc::new(SessionStore::new(
        Arc::new(MockAuthApi::new("context-secret")),
        Arc::new(MemoryStorage::new()),
    ));
    session.initialize_auth().await;
    AuthContext::new(session)
}

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_modal_transitions() {
    let ctx = context().await;
    assert_eq!(ctx.modal(), Modal::Hidden);

    ctx.open_login_modal();
    assert_eq!(ctx.modal(), Modal::Login);

    ctx.open_register_modal();
    assert_eq!(ctx.modal(), Modal::Register);

    ctx.close_modal();
    assert_eq!(ctx.modal(), Modal::Hidden);
}

#[tokio::test]
async fn test_flags_follow_session() {
    let session = Arc::new(SessionStore::new(
        Arc::new(MockAuthApi::new("context-secret")),
        Arc::new(MemoryStorage::new()),
    ));
    let ctx = AuthContext::new(session.clone());

    // Logged in before the startup check finished: not yet authenticated.
    session.login(&credentials("reader", "reader123")).await.unwrap();
    assert!(ctx.is_logged_in());
    assert!(!ctx.is_authenticated());

    session.initialize_auth().await;
    assert!(ctx.is_authenticated());
}

#[tokio::test]
async fn test_successful_login_closes_modal_and_returns_redirect() {
    let ctx = context().await;
    ctx.remember_redirect("/account?tab=drafts");
    ctx.open_login_modal();

    let outcome = ctx.submit_login(&credentials("reader", "reader123")).await.unwrap();

    assert!(outcome.session.is_logged_in);
    assert_eq!(outcome.navigate_to.as_deref(), Some("/account?tab=drafts"));
    assert_eq!(ctx.modal(), Modal::Hidden);
    assert_eq!(ctx.redirect_target(), None);
}

#[tokio::test]
async fn test_login_without_redirect_target() {
    let ctx = context().await;
    let outcome = ctx.submit_login(&credentials("admin", "admin123")).await.unwrap();
    assert!(outcome.navigate_to.is_none());
}

#[tokio::test]
async fn test_failed_login_keeps_modal_and_redirect() {
    let ctx = context().await;
    ctx.remember_redirect("/creator");
    ctx.open_login_modal();

    let result = ctx.submit_login(&credentials("reader", "nope")).await;

    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    assert_eq!(ctx.modal(), Modal::Login);
    assert_eq!(ctx.redirect_target().as_deref(), Some("/creator"));
    assert!(!ctx.is_logged_in());
}

#[tokio::test]
async fn test_successful_register_switches_to_login() {
    let ctx = context().await;
    ctx.open_register_modal();

    let response = ctx
        .submit_register(&RegisterRequest {
            username: "newcomer".to_string(),
            password: "hunter22".to_string(),
            email: Some("newcomer@example.com".to_string()),
        })
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(ctx.modal(), Modal::Login);
    assert!(!ctx.is_logged_in());
}

#[tokio::test]
async fn test_rejected_register_keeps_register_modal() {
    let ctx = context().await;
    ctx.open_register_modal();

    let result = ctx
        .submit_register(&RegisterRequest {
            username: "ab".to_string(),
            password: "hunter22".to_string(),
            email: None,
        })
        .await;

    assert!(matches!(result, Err(AuthError::RegistrationRejected(_))));
    assert_eq!(ctx.modal(), Modal::Register);
}

#[tokio::test]
async fn test_logout_resets_context() {
    let ctx = context().await;
    ctx.submit_login(&credentials("reader", "reader123")).await.unwrap();
    ctx.remember_redirect("/editor");
    ctx.open_login_modal();

    ctx.logout().await.unwrap();

    assert!(!ctx.is_logged_in());
    assert_eq!(ctx.modal(), Modal::Hidden);
    assert_eq!(ctx.redirect_target(), None);
}
