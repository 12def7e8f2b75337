//! An in-memory host document.
//!
//! Holds a flat map of element ids to their inner HTML, a ready state, and the
//! listeners waiting for content-loaded. [`MemoryDocument::fire_content_loaded`]
//! plays the part of the parser finishing.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use apiview_types::platform::BoxedCallback;
use apiview_types::{ListenerModel, OutputSelector, ReadyState};

use crate::{Document, DomError};

pub struct MemoryDocument {
    inner: Mutex<Inner>,
}

struct Inner {
    ready_state: ReadyState,
    listener_model: ListenerModel,
    listeners: Vec<BoxedCallback>,
    elements: BTreeMap<String, String>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new(ready_state: ReadyState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                ready_state,
                listener_model: ListenerModel::Standard,
                listeners: Vec::new(),
                elements: BTreeMap::new(),
            }),
        }
    }

    /// Add an element with the given id and initial content.
    pub fn with_element(self, id: impl Into<String>, html: impl Into<String>) -> Self {
        self.lock().elements.insert(id.into(), html.into());
        self
    }

    pub fn with_listener_model(self, model: ListenerModel) -> Self {
        self.lock().listener_model = model;
        self
    }

    /// Mark parsing finished and run every pending listener once.
    ///
    /// Listeners run after the internal lock is released, so they may read or
    /// write the document.
    pub fn fire_content_loaded(&self) {
        let listeners = {
            let mut inner = self.lock();
            if inner.ready_state == ReadyState::Loading {
                inner.ready_state = ReadyState::Interactive;
            }
            std::mem::take(&mut inner.listeners)
        };

        tracing::debug!(count = listeners.len(), "content loaded");
        for listener in listeners {
            listener();
        }
    }

    /// Move to `complete`. Listeners are not re-run.
    pub fn finish_loading(&self) {
        self.lock().ready_state = ReadyState::Complete;
    }

    #[must_use]
    pub fn pending_listeners(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Inner HTML of the element with `id`, if it exists.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<String> {
        self.lock().elements.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new(ReadyState::Loading)
    }
}

impl std::fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MemoryDocument")
            .field("ready_state", &inner.ready_state)
            .field("listener_model", &inner.listener_model)
            .field("pending_listeners", &inner.listeners.len())
            .field("elements", &inner.elements)
            .finish()
    }
}

impl Document for MemoryDocument {
    fn ready_state(&self) -> ReadyState {
        self.lock().ready_state
    }

    fn listener_model(&self) -> ListenerModel {
        self.lock().listener_model
    }

    fn on_content_loaded(&self, callback: BoxedCallback) {
        self.lock().listeners.push(callback);
    }

    fn inner_html(&self, selector: &OutputSelector) -> Result<String, DomError> {
        self.lock()
            .elements
            .get(selector.id())
            .cloned()
            .ok_or_else(|| DomError::NotFound {
                selector: selector.to_string(),
            })
    }

    fn set_inner_html(&self, selector: &OutputSelector, html: &str) -> Result<(), DomError> {
        let mut inner = self.lock();
        let slot = inner
            .elements
            .get_mut(selector.id())
            .ok_or_else(|| DomError::NotFound {
                selector: selector.to_string(),
            })?;
        html.clone_into(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pre() -> OutputSelector {
        OutputSelector::new("#pre").unwrap()
    }

    #[test]
    fn set_and_read_inner_html() {
        let doc = MemoryDocument::new(ReadyState::Complete).with_element("pre", "initial");
        assert_eq!(doc.inner_html(&pre()).unwrap(), "initial");

        doc.set_inner_html(&pre(), "<b>replaced</b>").unwrap();
        assert_eq!(doc.element("pre").as_deref(), Some("<b>replaced</b>"));
    }

    #[test]
    fn missing_element_is_not_found() {
        let doc = MemoryDocument::new(ReadyState::Complete);
        let err = doc.set_inner_html(&pre(), "x").unwrap_err();
        assert_eq!(
            err,
            DomError::NotFound {
                selector: "#pre".to_string()
            }
        );
    }

    #[test]
    fn content_loaded_runs_listeners_once() {
        let doc = MemoryDocument::default();
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            doc.on_content_loaded(Box::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }

        doc.fire_content_loaded();
        doc.fire_content_loaded();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(doc.ready_state(), ReadyState::Interactive);
        assert_eq!(doc.pending_listeners(), 0);
    }

    #[test]
    fn listeners_may_touch_the_document() {
        let doc = Arc::new(MemoryDocument::default().with_element("pre", ""));
        let handle = Arc::clone(&doc);
        doc.on_content_loaded(Box::new(move || {
            handle.set_inner_html(&pre(), "loaded").unwrap();
        }));

        doc.fire_content_loaded();
        assert_eq!(doc.element("pre").as_deref(), Some("loaded"));
    }

    #[test]
    fn finish_loading_keeps_listeners_pending() {
        let doc = MemoryDocument::default();
        doc.on_content_loaded(Box::new(|| {}));
        doc.finish_loading();
        assert_eq!(doc.ready_state(), ReadyState::Complete);
        assert_eq!(doc.pending_listeners(), 1);
    }
}
