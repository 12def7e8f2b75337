//! Page composition for apiview.
//!
//! ```text
//! Page::run() -> ready(document) -> JsonFetcher::get(endpoint) -> set_inner_html(output)
//!                     |                     |
//!                AwaitingReady       AwaitingResponse -> Rendered | ErrorLogged
//! ```

mod page;

pub use page::{Page, PageRun, PageSettings};

pub use apiview_types::{MarkupPolicy, OutputSelector, PagePhase};
