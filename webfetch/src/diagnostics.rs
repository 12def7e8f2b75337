//! Where failed requests are reported.

use std::sync::{Mutex, PoisonError};

use apiview_types::{MaybeSend, MaybeSync};

use crate::types::RequestFailure;

/// Sink for requests that could not complete.
pub trait Diagnostics: MaybeSend + MaybeSync {
    fn request_failed(&self, failure: &RequestFailure);
}

/// Writes each failure as a `tracing` error event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn request_failed(&self, failure: &RequestFailure) {
        tracing::error!(
            method = failure.method,
            url = %failure.url,
            error = %failure.error,
            "request failed"
        );
    }
}

/// Keeps every reported failure in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    entries: Mutex<Vec<RequestFailure>>,
}

impl MemoryDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<RequestFailure> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn request_failed(&self, failure: &RequestFailure) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure.clone());
    }
}
