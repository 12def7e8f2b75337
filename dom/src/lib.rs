//! Host document access for apiview.
//!
//! The page never reaches for a process-wide `document`. Every operation takes
//! a [`Document`] handle, so the same composition runs against the browser's
//! DOM or against a [`MemoryDocument`] in tests and on native hosts.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ready`] | Run a callback once the document has finished parsing |
//! | [`memory`] | In-memory document with a simulated content-loaded event |
//! | `web` | `web_sys::Document` binding (`web` feature, wasm32 only) |

pub mod memory;
pub mod ready;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

pub use memory::MemoryDocument;
pub use ready::ready;

use apiview_types::platform::BoxedCallback;
use apiview_types::{ListenerModel, OutputSelector, ReadyState};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("no element matches {selector}")]
    NotFound { selector: String },
    #[error("host document error: {0}")]
    Host(String),
}

/// The slice of a host document the page relies on.
pub trait Document {
    /// Current load state. Read once per readiness check.
    fn ready_state(&self) -> ReadyState;

    /// Which readiness rule applies to this host.
    fn listener_model(&self) -> ListenerModel {
        ListenerModel::Standard
    }

    /// Register `callback` to run exactly once when parsing completes.
    fn on_content_loaded(&self, callback: BoxedCallback);

    fn inner_html(&self, selector: &OutputSelector) -> Result<String, DomError>;

    /// Replace the element's content. `html` is interpreted as markup.
    fn set_inner_html(&self, selector: &OutputSelector, html: &str) -> Result<(), DomError>;
}

impl<D: Document + ?Sized> Document for std::sync::Arc<D> {
    fn ready_state(&self) -> ReadyState {
        (**self).ready_state()
    }

    fn listener_model(&self) -> ListenerModel {
        (**self).listener_model()
    }

    fn on_content_loaded(&self, callback: BoxedCallback) {
        (**self).on_content_loaded(callback);
    }

    fn inner_html(&self, selector: &OutputSelector) -> Result<String, DomError> {
        (**self).inner_html(selector)
    }

    fn set_inner_html(&self, selector: &OutputSelector, html: &str) -> Result<(), DomError> {
        (**self).set_inner_html(selector, html)
    }
}
