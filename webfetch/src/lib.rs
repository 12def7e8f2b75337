//! Single-shot JSON GET for the page.
//!
//! [`JsonFetcher::get`] is the callback form: it dispatches the request on a
//! background task and returns at once. [`fetch_json`] is the plain future
//! underneath it.
//!
//! # Outcomes
//!
//! | Response | Callback | Diagnostic channel | Handle resolves to |
//! |----------|----------|--------------------|--------------------|
//! | any status, JSON body | invoked once | untouched | `Ok(Delivered)` |
//! | connect/DNS/read failure | never | one [`RequestFailure`] | `Ok(Reported)` |
//! | any status, non-JSON body | never | untouched | `Err(MalformedJson)` |
//! | callback returns `Err` | invoked once | untouched | `Err(Handler)` |
//!
//! Malformed bodies never reach the diagnostic channel.
//! They surface to whoever awaits the [`RequestHandle`].

mod diagnostics;
mod types;

use std::future::Future;
use std::sync::Arc;

use apiview_types::MaybeSend;
use serde_json::Value;
use tokio::sync::oneshot;
use url::Url;

pub use diagnostics::{Diagnostics, MemoryDiagnostics, TracingDiagnostics};
pub use types::{BoxError, Delivery, FetchError, RequestFailure};

/// Issues GET requests relative to a base URL.
#[derive(Clone)]
pub struct JsonFetcher {
    client: reqwest::Client,
    base: Url,
    diagnostics: Arc<dyn Diagnostics>,
}

impl std::fmt::Debug for JsonFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFetcher")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl JsonFetcher {
    /// A fetcher reporting failures through [`TracingDiagnostics`].
    #[must_use]
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self {
            client,
            base,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The channel network failures are reported to.
    #[must_use]
    pub fn diagnostics(&self) -> Arc<dyn Diagnostics> {
        Arc::clone(&self.diagnostics)
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `url` against the base the way a page resolves a relative href.
    pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "url must not be empty".to_string(),
            });
        }
        self.base.join(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Dispatch a GET for `url` and hand the parsed body to `callback`.
    ///
    /// Returns as soon as the request task is spawned. `callback` runs at most
    /// once, on the request task. On native hosts the task goes to the current
    /// tokio runtime; with none running this fails with
    /// [`FetchError::NoRuntime`] and nothing is sent.
    pub fn get<F>(&self, url: &str, callback: F) -> Result<RequestHandle, FetchError>
    where
        F: FnOnce(Value) -> Result<(), BoxError> + MaybeSend + 'static,
    {
        let target = self.resolve(url)?;
        let client = self.client.clone();
        let diagnostics = Arc::clone(&self.diagnostics);
        let (tx, rx) = oneshot::channel();

        tracing::debug!(url = %target, "dispatching GET");
        let label = target.to_string();
        spawn(&label, async move {
            let outcome = match fetch_json(&client, &target).await {
                Ok(value) => callback(value)
                    .map(|()| Delivery::Delivered)
                    .map_err(|source| FetchError::Handler {
                        url: target.to_string(),
                        source,
                    }),
                Err(err) if err.is_network() => {
                    diagnostics.request_failed(&RequestFailure::from_error(&err));
                    Ok(Delivery::Reported)
                }
                Err(err) => Err(err),
            };
            // Nobody listening is fine; the outcome has already played out.
            let _ = tx.send(outcome);
        })?;

        Ok(RequestHandle { url: label, rx })
    }

    /// Fetch and parse `url` without touching the diagnostic channel.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let target = self.resolve(url)?;
        fetch_json(&self.client, &target).await
    }
}

/// Await the outcome of a dispatched request.
#[derive(Debug)]
pub struct RequestHandle {
    url: String,
    rx: oneshot::Receiver<Result<Delivery, FetchError>>,
}

impl RequestHandle {
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wait for the request task to finish.
    pub async fn finish(self) -> Result<Delivery, FetchError> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Interrupted { url: self.url }),
        }
    }
}

/// GET `url` and parse the body as JSON.
///
/// Any HTTP status counts as a completed response; only transport failures are
/// `Network` errors.
pub async fn fetch_json(client: &reqwest::Client, url: &Url) -> Result<Value, FetchError> {
    let network = |source| FetchError::Network {
        url: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(network)?;
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(%url, %status, "non-success status; parsing body anyway");
    }
    let body = response.text().await.map_err(network)?;

    serde_json::from_str(&body).map_err(|source| FetchError::MalformedJson {
        url: url.to_string(),
        source,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn<F>(url: &str, future: F) -> Result<(), FetchError>
where
    F: Future<Output = ()> + MaybeSend + 'static,
{
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|_| FetchError::NoRuntime { url: url.to_string() })?;
    runtime.spawn(future);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn spawn<F>(_url: &str, future: F) -> Result<(), FetchError>
where
    F: Future<Output = ()> + MaybeSend + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
    Ok(())
}
