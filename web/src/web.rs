use std::sync::Arc;

use apiview_engine::{Page, PageSettings};
use apiview_webfetch::{Diagnostics, JsonFetcher, RequestFailure};
use url::Url;
use wasm_bindgen::prelude::*;

/// Reports failed requests with `console.error`.
struct ConsoleDiagnostics;

impl Diagnostics for ConsoleDiagnostics {
    fn request_failed(&self, failure: &RequestFailure) {
        web_sys::console::error_1(&JsValue::from_str(&failure.to_string()));
    }
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let base = Url::parse(&window.location().href()?).map_err(js_error)?;

    let fetcher = JsonFetcher::new(reqwest::Client::new(), base)
        .with_diagnostics(Arc::new(ConsoleDiagnostics));
    let run = Page::new(Arc::new(document), fetcher, PageSettings::default()).run();

    // Rejections are not caught here; the host reports them as uncaught.
    let _ = wasm_bindgen_futures::future_to_promise(async move {
        run.finish()
            .await
            .map(|phase| JsValue::from_str(phase.as_str()))
            .map_err(js_error)
    });

    Ok(())
}
