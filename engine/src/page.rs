use std::sync::{Arc, Mutex, PoisonError};

use apiview_dom::{Document, ready};
use apiview_types::{MarkupPolicy, MaybeSend, MaybeSync, OutputSelector, PagePhase};
use apiview_webfetch::{
    BoxError, Delivery, Diagnostics, FetchError, JsonFetcher, RequestFailure, RequestHandle,
};
use serde_json::Value;
use tokio::sync::oneshot;

/// What the page fetches and where it writes the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    pub endpoint: String,
    pub output: OutputSelector,
    pub markup: MarkupPolicy,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            endpoint: "/api".to_string(),
            output: OutputSelector::default(),
            markup: MarkupPolicy::Raw,
        }
    }
}

type SharedPhase = Arc<Mutex<PagePhase>>;

fn read_phase(phase: &SharedPhase) -> PagePhase {
    *phase.lock().unwrap_or_else(PoisonError::into_inner)
}

fn advance(phase: &SharedPhase, next: PagePhase) {
    let mut current = phase.lock().unwrap_or_else(PoisonError::into_inner);
    let from = *current;
    let to = from.advance(next);
    if to != from {
        tracing::debug!(%from, %to, "page phase");
        *current = to;
    }
}

/// Forwards failures to the configured channel and marks the page as done.
struct PhaseDiagnostics {
    inner: Arc<dyn Diagnostics>,
    phase: SharedPhase,
}

impl Diagnostics for PhaseDiagnostics {
    fn request_failed(&self, failure: &RequestFailure) {
        self.inner.request_failed(failure);
        advance(&self.phase, PagePhase::ErrorLogged);
    }
}

/// The page script: once the document is ready, fetch the endpoint and write
/// the serialized response into the output element.
pub struct Page<D: ?Sized> {
    document: Arc<D>,
    fetcher: JsonFetcher,
    settings: PageSettings,
}

impl<D> Page<D>
where
    D: Document + MaybeSend + MaybeSync + ?Sized + 'static,
{
    pub fn new(document: Arc<D>, fetcher: JsonFetcher, settings: PageSettings) -> Self {
        Self {
            document,
            fetcher,
            settings,
        }
    }

    /// Start the load sequence. Runs once; the returned [`PageRun`] observes it.
    ///
    /// If the document is already parsed the request is dispatched before this
    /// returns. On native hosts that needs a running tokio runtime; without one
    /// nothing is sent and [`PageRun::finish`] reports
    /// [`FetchError::NoRuntime`].
    pub fn run(self) -> PageRun {
        let phase: SharedPhase = Arc::new(Mutex::new(PagePhase::AwaitingReady));
        let (dispatched_tx, dispatched_rx) = oneshot::channel();

        let Page {
            document,
            fetcher,
            settings,
        } = self;

        let tracked = PhaseDiagnostics {
            inner: fetcher.diagnostics(),
            phase: Arc::clone(&phase),
        };
        let fetcher = fetcher.with_diagnostics(Arc::new(tracked));

        let on_ready = {
            let phase = Arc::clone(&phase);
            let target = Arc::clone(&document);
            move || {
                advance(&phase, PagePhase::AwaitingResponse);
                let handler = render_into(target, settings.output, settings.markup, phase);
                let dispatched = fetcher.get(&settings.endpoint, handler);
                if let Err(err) = &dispatched {
                    tracing::error!(error = %err, "could not dispatch page request");
                }
                let _ = dispatched_tx.send(dispatched);
            }
        };

        ready(&*document, on_ready);

        PageRun {
            phase,
            dispatched: dispatched_rx,
        }
    }
}

fn render_into<D>(
    document: Arc<D>,
    output: OutputSelector,
    markup: MarkupPolicy,
    phase: SharedPhase,
) -> impl FnOnce(Value) -> Result<(), BoxError> + MaybeSend + 'static
where
    D: Document + MaybeSend + MaybeSync + ?Sized + 'static,
{
    move |data: Value| {
        let html = markup.render(&data);
        document.set_inner_html(&output, &html)?;
        tracing::debug!(selector = %output, bytes = html.len(), "rendered response");
        advance(&phase, PagePhase::Rendered);
        Ok(())
    }
}

/// Handle on a running page load.
#[derive(Debug)]
pub struct PageRun {
    phase: SharedPhase,
    dispatched: oneshot::Receiver<Result<RequestHandle, FetchError>>,
}

impl PageRun {
    #[must_use]
    pub fn phase(&self) -> PagePhase {
        read_phase(&self.phase)
    }

    /// Wait for the document to become ready and the request to play out.
    ///
    /// Returns the final phase, or the failure nothing handled: a body that is
    /// not JSON, or a render that could not find its element. Never resolves
    /// if the document never signals readiness.
    pub async fn finish(self) -> Result<PagePhase, FetchError> {
        let handle = match self.dispatched.await {
            Ok(dispatched) => dispatched?,
            // The ready listener was dropped without running.
            Err(_) => return Ok(read_phase(&self.phase)),
        };

        let delivery = handle.finish().await?;
        if delivery == Delivery::Reported {
            advance(&self.phase, PagePhase::ErrorLogged);
        }
        Ok(read_phase(&self.phase))
    }
}
