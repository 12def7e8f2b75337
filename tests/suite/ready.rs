//! Readiness gating against the in-memory document.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use apiview_dom::{MemoryDocument, ready};
use apiview_types::{ListenerModel, ReadyState};

fn counting() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    (calls, move || {
        seen.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn complete_document_runs_callback_synchronously() {
    let doc = MemoryDocument::new(ReadyState::Complete);
    let (calls, callback) = counting();

    ready(&doc, callback);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(doc.pending_listeners(), 0);
}

#[test]
fn loading_document_defers_until_content_loaded() {
    let doc = MemoryDocument::new(ReadyState::Loading);
    let (calls, callback) = counting();

    ready(&doc, callback);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(doc.pending_listeners(), 1);

    doc.fire_content_loaded();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    doc.finish_loading();
    doc.fire_content_loaded();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn legacy_model_treats_interactive_as_not_ready() {
    let doc = MemoryDocument::new(ReadyState::Interactive)
        .with_listener_model(ListenerModel::Legacy);
    let (calls, callback) = counting();

    ready(&doc, callback);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(doc.pending_listeners(), 1);
}

#[test]
fn each_registration_runs_once() {
    let doc = MemoryDocument::new(ReadyState::Loading);
    let (first, a) = counting();
    let (second, b) = counting();

    ready(&doc, a);
    ready(&doc, b);
    doc.fire_content_loaded();

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}
