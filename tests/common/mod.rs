//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use apiview_dom::MemoryDocument;
use apiview_engine::{Page, PageRun, PageSettings};
use apiview_types::ReadyState;
use apiview_webfetch::{JsonFetcher, MemoryDiagnostics};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a mock server whose `/api` answers `status` with `body`.
pub async fn start_api_mock(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

pub fn base_of(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("mock server uri is a valid url")
}

/// A loopback URL nothing is listening on.
pub fn closed_port_base() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("valid url")
}

/// A document with a single `#pre` element holding `initial`.
pub fn page_document(state: ReadyState, initial: &str) -> Arc<MemoryDocument> {
    Arc::new(MemoryDocument::new(state).with_element("pre", initial))
}

/// Run the default page (`GET /api` into `#pre`) against `document`.
pub fn run_page(
    document: &Arc<MemoryDocument>,
    base: Url,
    diagnostics: &Arc<MemoryDiagnostics>,
) -> PageRun {
    let fetcher =
        JsonFetcher::new(reqwest::Client::new(), base).with_diagnostics(diagnostics.clone());
    Page::new(Arc::clone(document), fetcher, PageSettings::default()).run()
}
