//! End-to-end page loads: document readiness, GET, render.

use std::sync::Arc;

use apiview_types::{PagePhase, ReadyState};
use apiview_webfetch::{FetchError, MemoryDiagnostics};
use serde_json::{Value, json};

use crate::common::{base_of, closed_port_base, page_document, run_page, start_api_mock};

#[tokio::test]
async fn ready_document_renders_response_text() {
    let server = start_api_mock(200, r#"{"x":true}"#).await;
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let doc = page_document(ReadyState::Complete, "");

    let run = run_page(&doc, base_of(&server), &diagnostics);
    // Already parsed: the request is out before `run` returns.
    assert_eq!(run.phase(), PagePhase::AwaitingResponse);

    assert_eq!(run.finish().await.unwrap(), PagePhase::Rendered);
    assert_eq!(doc.element("pre").as_deref(), Some(r#"{"x":true}"#));
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn loading_document_requests_only_after_content_loaded() {
    let server = start_api_mock(200, "[1,2,3]").await;
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let doc = page_document(ReadyState::Loading, "placeholder");

    let run = run_page(&doc, base_of(&server), &diagnostics);
    assert_eq!(run.phase(), PagePhase::AwaitingReady);
    assert!(server.received_requests().await.unwrap().is_empty());

    doc.fire_content_loaded();
    assert_eq!(run.finish().await.unwrap(), PagePhase::Rendered);
    assert_eq!(doc.element("pre").as_deref(), Some("[1,2,3]"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn network_failure_logs_once_and_leaves_element() {
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let doc = page_document(ReadyState::Complete, "before");

    let run = run_page(&doc, closed_port_base(), &diagnostics);

    assert_eq!(run.finish().await.unwrap(), PagePhase::ErrorLogged);
    assert_eq!(doc.element("pre").as_deref(), Some("before"));

    let entries = diagnostics.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].method, "GET");
    assert!(entries[0].url.ends_with("/api"));
}

#[tokio::test]
async fn malformed_body_escapes_unhandled() {
    let server = start_api_mock(200, "<html>oops</html>").await;
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let doc = page_document(ReadyState::Complete, "before");

    let run = run_page(&doc, base_of(&server), &diagnostics);
    let err = run.finish().await.unwrap_err();

    assert!(matches!(err, FetchError::MalformedJson { .. }), "got {err:?}");
    assert_eq!(doc.element("pre").as_deref(), Some("before"));
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn rendered_text_keeps_key_order() {
    let server = start_api_mock(200, r#"{ "zeta": 1, "alpha": {"b": null, "a": "s"} }"#).await;
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let doc = page_document(ReadyState::Complete, "");

    let run = run_page(&doc, base_of(&server), &diagnostics);

    assert_eq!(run.finish().await.unwrap(), PagePhase::Rendered);
    assert_eq!(
        doc.element("pre").as_deref(),
        Some(r#"{"zeta":1,"alpha":{"b":null,"a":"s"}}"#)
    );
}

#[tokio::test]
async fn rendered_text_is_what_the_browser_would_write() {
    let server = start_api_mock(200, r#"{"b":1.0,"1":"one","list":[1e2,0.25]}"#).await;
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let doc = page_document(ReadyState::Complete, "");

    let run = run_page(&doc, base_of(&server), &diagnostics);
    assert_eq!(run.finish().await.unwrap(), PagePhase::Rendered);

    let rendered = doc.element("pre").unwrap();
    assert_eq!(rendered, r#"{"1":"one","b":1,"list":[100,0.25]}"#);
    let reparsed: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(reparsed, json!({"1": "one", "b": 1, "list": [100, 0.25]}));
}

#[tokio::test]
async fn never_ready_document_sends_nothing() {
    let server = start_api_mock(200, "{}").await;
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let doc = page_document(ReadyState::Loading, "");

    let run = run_page(&doc, base_of(&server), &diagnostics);
    tokio::task::yield_now().await;

    assert_eq!(run.phase(), PagePhase::AwaitingReady);
    assert_eq!(doc.pending_listeners(), 1);
    assert!(server.received_requests().await.unwrap().is_empty());
}
