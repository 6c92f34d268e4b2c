use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use server::realtime::{self, ChangeHub};
use store::{ChangeEvent, ContentRemote, MemoryRemote, Project, ProjectDraft};
use tower::ServiceExt;

const MIGRATION: &str = include_str!("../migrations/20240601000000_site_content.sql");

#[tokio::test]
async fn sse_sends_ready_before_changes() {
    let hub = ChangeHub::new();
    let router = realtime::router(hub.clone());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/realtime")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    hub.publish(ChangeEvent::ProjectInserted {
        project: Project::from_draft(11, ProjectDraft::default()),
    });
    drop(hub);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let ready = text.find("event: ready").unwrap();
    let change = text.find("event: change").unwrap();
    assert!(ready < change);
    assert!(text.contains(r#""kind":"project_inserted""#));
    assert!(text.contains(r#""id":11"#));
}

#[tokio::test]
async fn malformed_notifications_never_reach_subscribers() {
    let store = MemoryRemote::seeded();
    let hub = ChangeHub::new();
    let mut rx = hub.subscribe();

    assert!(hub
        .relay(&store, r#"{"table":"projects","op":"INSERT"}"#)
        .await
        .is_err());
    hub.relay(&store, r#"{"table":"content","op":"UPDATE","id":1}"#)
        .await
        .unwrap();

    match rx.recv().await.unwrap() {
        ChangeEvent::ContentUpdated { content } => {
            assert_eq!(content, store.content().unwrap())
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn large_rows_reach_subscribers_through_id_only_notifications() {
    let store = MemoryRemote::seeded();
    let description = "A long write-up. ".repeat(1024);
    assert!(description.len() > 8000);

    let project = Project {
        description: description.clone(),
        ..store.project(1).unwrap()
    };
    store.update_project(project).await.unwrap();

    let payload = r#"{"table":"projects","op":"UPDATE","id":1}"#;
    let hub = ChangeHub::new();
    let mut rx = hub.subscribe();
    assert_eq!(hub.relay(&store, payload).await.unwrap(), 1);

    match rx.recv().await.unwrap() {
        ChangeEvent::ProjectUpdated { project } => {
            assert_eq!(project.id, 1);
            assert_eq!(project.description, description);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn trigger_payload_names_the_row_without_embedding_it() {
    let start = MIGRATION.find("FUNCTION notify_site_change").unwrap();
    let end = start + MIGRATION[start..].find("$$ LANGUAGE").unwrap();
    let body = &MIGRATION[start..end];

    assert!(body.contains("'id'"));
    assert!(!body.contains("row_to_json"));
    assert!(!body.contains("to_jsonb"));
}
