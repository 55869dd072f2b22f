//! Integration tests for login, logout, health and the end-to-end portal flow.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use itorg_client::dashboard::{OFFLINE, backend_health};
use itorg_client::{
    ApiClient, ClientConfig, ClientError, PreconditionError, ResourceListController,
    SessionStore, TransportError, auth,
};
use itorg_core::{Project, ProjectStatus};
use itorg_integration_tests::FakeApi;
use secrecy::{ExposeSecret, SecretString};

// =============================================================================
// Login / logout
// =============================================================================

#[tokio::test]
async fn test_login_stores_returned_token() {
    let fake = FakeApi::spawn().await;
    let api = fake.client();

    auth::login(&api, "ops@example.com").await.unwrap();

    let token = api.session().token().await.unwrap();
    assert_eq!(token.expose_secret(), "demo-token-ops@example.com");

    let requests = fake.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/auth/login");
    assert_eq!(requests[0].query.as_deref(), Some("email=ops%40example.com"));
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn test_rejected_login_stores_nothing() {
    let fake = FakeApi::spawn().await;
    let api = fake.client();

    let err = auth::login(&api, "not-an-email").await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Status { .. })
    ));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert!(!api.session().is_authed().await);
}

#[tokio::test]
async fn test_logout_drops_bearer_header() {
    let fake = FakeApi::spawn().await;
    let api = fake.client();

    auth::login(&api, "ops@example.com").await.unwrap();
    api.health().await.unwrap();
    auth::logout(api.session()).await.unwrap();
    api.health().await.unwrap();

    let requests = fake.requests();
    assert_eq!(
        requests[1].authorization.as_deref(),
        Some("Bearer demo-token-ops@example.com")
    );
    assert_eq!(requests[2].authorization, None);
    assert!(!api.session().is_authed().await);
}

#[tokio::test]
async fn test_malformed_session_file_still_serves_commands() {
    let fake = FakeApi::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"token": 123}"#).unwrap();

    let session = Arc::new(SessionStore::open_file(&path).unwrap());
    let api = fake.client_with_session(Arc::clone(&session));
    assert!(!session.is_authed().await);
    assert_eq!(backend_health(&api).await, "ok");

    auth::logout(&session).await.unwrap();
    assert!(!SessionStore::open_file(&path).unwrap().is_authed().await);

    auth::login(&api, "ops@example.com").await.unwrap();
    assert!(SessionStore::open_file(&path).unwrap().is_authed().await);
}

#[tokio::test]
async fn test_empty_token_sends_no_bearer() {
    let fake = FakeApi::spawn().await;
    let api = fake.client();

    api.session().set_token(SecretString::from("")).await.unwrap();
    api.health().await.unwrap();

    assert!(!api.session().is_authed().await);
    assert_eq!(fake.requests()[0].authorization, None);
}

#[tokio::test]
async fn test_session_file_survives_restart() {
    let fake = FakeApi::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("itorg").join("session.json");

    let api = fake.client_with_session(Arc::new(SessionStore::open_file(&path).unwrap()));
    auth::login(&api, "ops@example.com").await.unwrap();
    drop(api);

    let reopened = Arc::new(SessionStore::open_file(&path).unwrap());
    assert!(reopened.is_authed().await);

    let api = fake.client_with_session(Arc::clone(&reopened));
    api.health().await.unwrap();
    assert_eq!(
        fake.requests().last().unwrap().authorization.as_deref(),
        Some("Bearer demo-token-ops@example.com")
    );

    auth::logout(&reopened).await.unwrap();
    let after_logout = SessionStore::open_file(&path).unwrap();
    assert!(!after_logout.is_authed().await);
}

// =============================================================================
// Health and transport errors
// =============================================================================

#[tokio::test]
async fn test_backend_health_reports_status() {
    let fake = FakeApi::spawn().await;
    assert_eq!(backend_health(&fake.client()).await, "ok");
}

#[tokio::test]
async fn test_backend_health_offline_when_unreachable() {
    let config = ClientConfig::for_endpoint("http://127.0.0.1:9", "unused.json").unwrap();
    let api = ApiClient::new(&config, Arc::new(SessionStore::in_memory())).unwrap();

    assert_eq!(backend_health(&api).await, OFFLINE);
}

#[tokio::test]
async fn test_error_status_carries_payload() {
    let fake = FakeApi::spawn().await;

    let err = fake
        .client()
        .get::<serde_json::Value>("/widgets")
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert!(err.payload().contains("Not Found"));
}

// =============================================================================
// End to end
// =============================================================================

#[tokio::test]
async fn test_portal_walkthrough() {
    let fake = FakeApi::spawn().await;
    let api = fake.client();
    let mut projects = ResourceListController::<Project>::new(api.clone());

    auth::login(&api, "a@b.com").await.unwrap();
    assert!(api.session().is_authed().await);

    projects.load().await.unwrap();
    assert!(projects.items().is_empty());

    projects.form_mut().name = "X".to_string();
    projects.form_mut().description = "Y".to_string();
    projects.create().await.unwrap();
    assert_eq!(projects.items().len(), 1);
    assert_eq!(projects.items()[0].name, "X");
    assert_eq!(projects.items()[0].description, "Y");
    assert_eq!(projects.items()[0].status, ProjectStatus::Planned);

    let id = projects.items()[0].id;
    projects
        .update_status(id, ProjectStatus::Active)
        .await
        .unwrap();
    assert_eq!(projects.items()[0].status, ProjectStatus::Active);
    assert_eq!(projects.items()[0].description, "Y");

    projects.remove(id).await.unwrap();
    assert!(projects.items().is_empty());

    auth::logout(api.session()).await.unwrap();
    assert!(!api.session().is_authed().await);

    let sent = fake.request_count();
    projects.form_mut().name = "Z".to_string();
    let err = projects.create().await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Precondition(PreconditionError::NotAuthenticated)
    ));
    assert_eq!(fake.request_count(), sent);
}
