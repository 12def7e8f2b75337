//! Error and outcome types for JSON requests.

use std::fmt;
use thiserror::Error;

/// Error type a response handler may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures that end a request without a delivered value.
///
/// Only `Network` is recovered by [`crate::JsonFetcher::get`]; it becomes a
/// [`RequestFailure`] on the diagnostic channel. The others resolve the
/// request handle with `Err` and are left to whoever awaits it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("GET {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} is not valid JSON: {source}")]
    MalformedJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response handler for {url} failed: {source}")]
    Handler {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("request task for {url} ended without an outcome")]
    Interrupted { url: String },

    #[error("cannot dispatch GET {url}: no async runtime is running")]
    NoRuntime { url: String },
}

impl FetchError {
    /// The request URL the error belongs to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Network { url, .. }
            | FetchError::MalformedJson { url, .. }
            | FetchError::Handler { url, .. }
            | FetchError::Interrupted { url }
            | FetchError::NoRuntime { url } => url,
        }
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network { .. })
    }
}

/// The failed request as handed to the diagnostic channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub method: &'static str,
    pub url: String,
    pub error: String,
}

impl RequestFailure {
    pub(crate) fn from_error(err: &FetchError) -> Self {
        let error = match err {
            // reqwest's Display already names the URL; keep the cause chain only.
            FetchError::Network { source, .. } => error_chain(source),
            other => other.to_string(),
        };
        Self {
            method: "GET",
            url: err.url().to_string(),
            error,
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.method, self.url, self.error)
    }
}

/// How a successfully dispatched request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The callback received the parsed body.
    Delivered,
    /// The request never completed; a failure was reported instead.
    Reported,
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
