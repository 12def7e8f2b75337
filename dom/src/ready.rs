use apiview_types::MaybeSend;

use crate::Document;

/// Run `callback` once `document` has finished parsing.
///
/// If parsing is already over the callback runs synchronously, before this
/// returns. Otherwise it is handed to the document's one-shot content-loaded
/// notification.
pub fn ready<D, F>(document: &D, callback: F)
where
    D: Document + ?Sized,
    F: FnOnce() + MaybeSend + 'static,
{
    let state = document.ready_state();
    let model = document.listener_model();

    if state.is_parsed(model) {
        tracing::debug!(%state, ?model, "document already parsed; running callback now");
        callback();
    } else {
        tracing::debug!(%state, ?model, "deferring callback until content loaded");
        document.on_content_loaded(Box::new(callback));
    }
}
