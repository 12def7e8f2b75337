use apiview_types::platform::BoxedCallback;
use apiview_types::{ListenerModel, OutputSelector, ReadyState};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::JsValue;

use crate::{Document, DomError};

const CONTENT_LOADED: &str = "DOMContentLoaded";

fn host_error(err: &JsValue) -> DomError {
    DomError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn query(doc: &web_sys::Document, selector: &OutputSelector) -> Result<web_sys::Element, DomError> {
    doc.query_selector(selector.as_str())
        .map_err(|e| host_error(&e))?
        .ok_or_else(|| DomError::NotFound {
            selector: selector.to_string(),
        })
}

impl Document for web_sys::Document {
    fn ready_state(&self) -> ReadyState {
        // Hosts only ever report the three states; anything else is still loading.
        web_sys::Document::ready_state(self)
            .parse()
            .unwrap_or(ReadyState::Loading)
    }

    fn listener_model(&self) -> ListenerModel {
        match js_sys::Reflect::has(self, &JsValue::from_str("attachEvent")) {
            Ok(true) => ListenerModel::Legacy,
            _ => ListenerModel::Standard,
        }
    }

    fn on_content_loaded(&self, callback: BoxedCallback) {
        let listener = Closure::once_into_js(move || callback());
        let options = web_sys::AddEventListenerOptions::new();
        options.set_once(true);

        if let Err(err) = self.add_event_listener_with_callback_and_add_event_listener_options(
            CONTENT_LOADED,
            listener.unchecked_ref(),
            &options,
        ) {
            tracing::error!(error = ?err, "failed to register {CONTENT_LOADED} listener");
        }
    }

    fn inner_html(&self, selector: &OutputSelector) -> Result<String, DomError> {
        Ok(query(self, selector)?.inner_html())
    }

    fn set_inner_html(&self, selector: &OutputSelector, html: &str) -> Result<(), DomError> {
        query(self, selector)?.set_inner_html(html);
        Ok(())
    }
}
