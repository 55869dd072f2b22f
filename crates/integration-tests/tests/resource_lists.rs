//! Integration tests for the resource list controllers.
//!
//! Each test spawns its own [`FakeApi`] so request logs never interleave.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use itorg_client::{
    ApiClient, ClientError, PreconditionError, ResourceListController, TransportError,
};
use itorg_core::{
    Asset, AssetDraft, AssetStatus, AssetType, Project, ProjectDraft, ProjectId, ProjectStatus,
    Resource, ResourceKind, Ticket, TicketDraft, TicketPriority, TicketStatus,
};
use itorg_integration_tests::FakeApi;
use secrecy::SecretString;
use serde_json::json;

async fn authed_client(fake: &FakeApi) -> ApiClient {
    let api = fake.client();
    api.session()
        .set_token(SecretString::from("demo-token-ops@example.com"))
        .await
        .unwrap();
    api
}

fn seed_project(fake: &FakeApi, name: &str, status: &str) -> i64 {
    fake.seed(
        ResourceKind::Project,
        &json!({ "name": name, "description": "", "status": status }),
    )
}

// =============================================================================
// Load
// =============================================================================

#[tokio::test]
async fn test_load_replaces_items_in_server_order() {
    let fake = FakeApi::spawn().await;
    seed_project(&fake, "Wiki", "planned");
    seed_project(&fake, "VPN", "active");

    let mut projects = ResourceListController::<Project>::new(fake.client());
    projects.load().await.unwrap();

    let names: Vec<_> = projects.items().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Wiki", "VPN"]);
    assert_eq!(projects.items()[1].status, ProjectStatus::Active);
    assert!(!projects.is_stale());
}

#[tokio::test]
async fn test_load_twice_without_changes_is_idempotent() {
    let fake = FakeApi::spawn().await;
    seed_project(&fake, "Wiki", "planned");

    let mut projects = ResourceListController::<Project>::new(fake.client());
    projects.load().await.unwrap();
    let first = projects.items().to_vec();
    projects.load().await.unwrap();

    assert_eq!(projects.items(), first.as_slice());
}

#[tokio::test]
async fn test_failed_load_keeps_items_and_marks_stale() {
    let fake = FakeApi::spawn().await;
    seed_project(&fake, "Wiki", "planned");

    let mut projects = ResourceListController::<Project>::new(fake.client());
    projects.load().await.unwrap();

    fake.fail_lists(true);
    let err = projects.load().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert_eq!(projects.items().len(), 1);
    assert!(projects.is_stale());

    fake.fail_lists(false);
    projects.load().await.unwrap();
    assert!(!projects.is_stale());
}

#[tokio::test]
async fn test_anonymous_load_is_allowed() {
    let fake = FakeApi::spawn().await;
    seed_project(&fake, "Wiki", "planned");

    let mut projects = ResourceListController::<Project>::new(fake.client());
    projects.load().await.unwrap();

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, None);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_adds_one_item_and_resets_form() {
    let fake = FakeApi::spawn().await;
    seed_project(&fake, "Wiki", "planned");

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    projects.load().await.unwrap();

    let draft = ProjectDraft {
        name: "Laptop refresh".to_string(),
        description: "Replace 2019 fleet".to_string(),
        status: ProjectStatus::Active,
    };
    projects.set_form(draft.clone());
    let created = projects.create().await.unwrap();

    assert!(created.matches_draft(&draft));
    assert_eq!(projects.items().len(), 2);
    assert!(projects.items().iter().any(|p| p.matches_draft(&draft)));
    assert_eq!(projects.form(), &ProjectDraft::default());
    assert_eq!(
        fake.last_body().unwrap(),
        json!({ "name": "Laptop refresh", "description": "Replace 2019 fleet", "status": "active" })
    );
}

#[tokio::test]
async fn test_create_sends_bearer_then_reloads() {
    let fake = FakeApi::spawn().await;

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    projects.form_mut().name = "Intranet".to_string();
    projects.create().await.unwrap();

    let requests = fake.requests();
    let calls: Vec<_> = requests
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(calls, [("POST", "/projects"), ("GET", "/projects")]);
    for request in &requests {
        assert_eq!(
            request.authorization.as_deref(),
            Some("Bearer demo-token-ops@example.com")
        );
    }
}

#[tokio::test]
async fn test_failed_create_keeps_form_and_does_not_reload() {
    let fake = FakeApi::spawn().await;

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    projects.form_mut().name = "Intranet".to_string();

    fake.fail_mutations(true);
    let err = projects.create().await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert_eq!(projects.form().name, "Intranet");
    assert_eq!(fake.request_count(), 1);
}

#[tokio::test]
async fn test_failed_reload_after_create_is_not_an_error() {
    let fake = FakeApi::spawn().await;

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    projects.load().await.unwrap();
    projects.form_mut().name = "Intranet".to_string();

    fake.fail_lists(true);
    let created = projects.create().await.unwrap();

    assert_eq!(created.name, "Intranet");
    assert!(projects.is_stale());
    assert!(projects.items().is_empty());
    assert_eq!(fake.records(ResourceKind::Project).len(), 1);
}

// =============================================================================
// Update status
// =============================================================================

#[tokio::test]
async fn test_update_status_overwrites_full_record() {
    let fake = FakeApi::spawn().await;
    let id = seed_project(&fake, "Wiki", "planned");
    fake.seed(
        ResourceKind::Project,
        &json!({ "name": "Other", "description": "", "status": "planned" }),
    );

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    projects.load().await.unwrap();
    let before = projects.find(ProjectId::new(id)).cloned().unwrap();

    let updated = projects
        .update_status(ProjectId::new(id), ProjectStatus::Done)
        .await
        .unwrap();

    assert_eq!(updated.status, ProjectStatus::Done);
    assert_eq!(updated.name, before.name);

    let body = fake.last_body().unwrap();
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["name"], "Wiki");
    assert_eq!(body["description"], "");
    assert_eq!(body["status"], "done");
    assert!(before.created_at.is_some());
    assert_eq!(body["created_at"], serde_json::to_value(before.created_at).unwrap());
    assert_eq!(body["updated_at"], serde_json::to_value(before.updated_at).unwrap());

    let after = projects.find(ProjectId::new(id)).unwrap();
    assert_eq!(after.status, ProjectStatus::Done);
    assert_eq!(after.name, before.name);
    assert_eq!(after.description, before.description);
    assert_eq!(
        projects.find(ProjectId::new(id + 1)).unwrap().status,
        ProjectStatus::Planned
    );
}

#[tokio::test]
async fn test_ticket_status_update_sends_every_field() {
    let fake = FakeApi::spawn().await;
    let id = fake.seed(
        ResourceKind::Ticket,
        &json!({ "title": "VPN drops every hour", "description": "Since Monday",
                 "priority": "high", "status": "open", "requester_email": "jo@example.com" }),
    );

    let mut tickets = ResourceListController::<Ticket>::new(authed_client(&fake).await);
    tickets.load().await.unwrap();
    let before = tickets.items()[0].clone();

    tickets
        .update_status(before.id, TicketStatus::Resolved)
        .await
        .unwrap();

    let body = fake.last_body().unwrap();
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["title"], "VPN drops every hour");
    assert_eq!(body["description"], "Since Monday");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["requester_email"], "jo@example.com");
    assert_eq!(body["status"], "resolved");
    assert_eq!(body["created_at"], serde_json::to_value(before.created_at).unwrap());
    assert_eq!(body["updated_at"], serde_json::to_value(before.updated_at).unwrap());
}

#[tokio::test]
async fn test_update_unknown_id_sends_nothing() {
    let fake = FakeApi::spawn().await;
    seed_project(&fake, "Wiki", "planned");

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    projects.load().await.unwrap();
    let sent = fake.request_count();

    let err = projects
        .update_status(ProjectId::new(999), ProjectStatus::Active)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Precondition(PreconditionError::ItemNotFound { .. })
    ));
    assert_eq!(fake.request_count(), sent);
}

#[tokio::test]
async fn test_failed_update_does_not_reload() {
    let fake = FakeApi::spawn().await;
    let id = seed_project(&fake, "Wiki", "planned");

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    projects.load().await.unwrap();

    fake.fail_mutations(true);
    let err = projects
        .update_status(ProjectId::new(id), ProjectStatus::Active)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Status { .. })
    ));
    let requests = fake.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, "PUT");
    assert_eq!(
        projects.find(ProjectId::new(id)).unwrap().status,
        ProjectStatus::Planned
    );
}

// =============================================================================
// Remove
// =============================================================================

#[tokio::test]
async fn test_remove_deletes_and_reloads() {
    let fake = FakeApi::spawn().await;
    let id = seed_project(&fake, "Wiki", "planned");

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    projects.load().await.unwrap();
    projects.remove(ProjectId::new(id)).await.unwrap();

    assert!(projects.items().is_empty());
    assert!(fake.records(ResourceKind::Project).is_empty());
}

#[tokio::test]
async fn test_remove_unknown_id_reports_server_status() {
    let fake = FakeApi::spawn().await;

    let mut projects = ResourceListController::<Project>::new(authed_client(&fake).await);
    let err = projects.remove(ProjectId::new(42)).await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/projects/42");
}

// =============================================================================
// Tickets and assets
// =============================================================================

#[tokio::test]
async fn test_ticket_lifecycle_uses_hyphenated_status() {
    let fake = FakeApi::spawn().await;

    let mut tickets = ResourceListController::<Ticket>::new(authed_client(&fake).await);
    tickets.set_form(TicketDraft {
        title: "VPN drops every hour".to_string(),
        priority: TicketPriority::High,
        requester_email: "jo@example.com".to_string(),
        ..TicketDraft::default()
    });
    let created = tickets.create().await.unwrap();

    assert_eq!(created.status, TicketStatus::Open);
    assert_eq!(created.requester(), Some("jo@example.com"));

    tickets
        .update_status(created.id, TicketStatus::InProgress)
        .await
        .unwrap();

    assert_eq!(fake.last_body().unwrap()["status"], "in-progress");
    assert_eq!(tickets.items()[0].status, TicketStatus::InProgress);
    assert_eq!(tickets.items()[0].priority, TicketPriority::High);
}

#[tokio::test]
async fn test_asset_type_goes_over_the_wire_as_type() {
    let fake = FakeApi::spawn().await;

    let mut assets = ResourceListController::<Asset>::new(authed_client(&fake).await);
    assets.set_form(AssetDraft {
        kind: AssetType::Vm,
        make_model: "Ubuntu 24.04".to_string(),
        serial: "vm-017".to_string(),
        ..AssetDraft::default()
    });
    let created = assets.create().await.unwrap();

    let body = fake.last_body().unwrap();
    assert_eq!(body["type"], "vm");
    assert_eq!(body["status"], "stock");
    assert_eq!(created.kind, AssetType::Vm);
    assert_eq!(created.assignee(), None);

    assets
        .update_status(created.id, AssetStatus::Retired)
        .await
        .unwrap();
    assert_eq!(assets.items()[0].status, AssetStatus::Retired);
    assert_eq!(assets.items()[0].serial, "vm-017");
}

#[tokio::test]
async fn test_kinds_use_separate_collections() {
    let fake = FakeApi::spawn().await;
    seed_project(&fake, "Wiki", "planned");
    fake.seed(
        ResourceKind::Ticket,
        &json!({ "title": "Printer jam", "description": "", "priority": "low", "status": "open",
                 "requester_email": "" }),
    );

    let api = fake.client();
    let mut projects = ResourceListController::<Project>::new(api.clone());
    let mut tickets = ResourceListController::<Ticket>::new(api.clone());
    let mut assets = ResourceListController::<Asset>::new(api);
    projects.load().await.unwrap();
    tickets.load().await.unwrap();
    assets.load().await.unwrap();

    assert_eq!(projects.items().len(), 1);
    assert_eq!(tickets.items().len(), 1);
    assert!(assets.items().is_empty());
    assert_eq!(tickets.items()[0].requester(), None);
}
