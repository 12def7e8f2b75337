//! Core domain types for apiview.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Both the native host and the browser host build on these.

#![allow(clippy::missing_errors_doc)]

mod json_text;
mod markup;
pub mod platform;

pub use json_text::to_json_text;
pub use markup::{MarkupPolicy, escape_markup};
pub use platform::{MaybeSend, MaybeSync};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Document Readiness
// ============================================================================

/// Load state of a host document, as reported by `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown document ready state: {0:?}")]
pub struct ReadyStateParseError(pub String);

impl ReadyState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ReadyState::Loading => "loading",
            ReadyState::Interactive => "interactive",
            ReadyState::Complete => "complete",
        }
    }

    /// Whether initial parsing is over under the given listener model.
    ///
    /// Legacy hosts can report `interactive` before the tree is safe to touch,
    /// so only `complete` counts there.
    #[must_use]
    pub const fn is_parsed(self, model: ListenerModel) -> bool {
        match model {
            ListenerModel::Legacy => matches!(self, ReadyState::Complete),
            ListenerModel::Standard => !matches!(self, ReadyState::Loading),
        }
    }
}

impl FromStr for ReadyState {
    type Err = ReadyStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loading" => Ok(ReadyState::Loading),
            "interactive" => Ok(ReadyState::Interactive),
            "complete" => Ok(ReadyState::Complete),
            _ => Err(ReadyStateParseError(s.to_string())),
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event attachment model exposed by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerModel {
    /// `addEventListener` hosts.
    #[default]
    Standard,
    /// Hosts that still expose `attachEvent`.
    Legacy,
}

// ============================================================================
// Output Selector
// ============================================================================

/// An `#id` selector naming the single element the page writes into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputSelector(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("output selector must not be empty")]
    Empty,
    #[error("output selector must be an id selector like #pre (got {0:?})")]
    NotAnId(String),
    #[error("output selector id contains whitespace or selector syntax: {0:?}")]
    InvalidId(String),
}

impl OutputSelector {
    pub fn new(raw: impl Into<String>) -> Result<Self, SelectorError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        let Some(id) = trimmed.strip_prefix('#') else {
            return Err(SelectorError::NotAnId(raw));
        };
        if id.is_empty()
            || id
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '#' | '.' | '[' | ']' | '>' | ',' | ':'))
        {
            return Err(SelectorError::InvalidId(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The full selector, including the leading `#`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The element id without the leading `#`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0[1..]
    }
}

impl Default for OutputSelector {
    fn default() -> Self {
        Self("#pre".to_string())
    }
}

impl TryFrom<String> for OutputSelector {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for OutputSelector {
    type Error = SelectorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutputSelector> for String {
    fn from(value: OutputSelector) -> Self {
        value.0
    }
}

impl fmt::Display for OutputSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Page Lifecycle
// ============================================================================

/// Where a page load currently stands. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePhase {
    AwaitingReady,
    AwaitingResponse,
    Rendered,
    ErrorLogged,
}

impl PagePhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, PagePhase::Rendered | PagePhase::ErrorLogged)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PagePhase::AwaitingReady => "awaiting_ready",
            PagePhase::AwaitingResponse => "awaiting_response",
            PagePhase::Rendered => "rendered",
            PagePhase::ErrorLogged => "error_logged",
        }
    }

    /// Advance to `next` unless that would move backwards.
    #[must_use]
    pub fn advance(self, next: PagePhase) -> PagePhase {
        if next.rank() >= self.rank() && !self.is_terminal() {
            next
        } else {
            self
        }
    }

    const fn rank(self) -> u8 {
        match self {
            PagePhase::AwaitingReady => 0,
            PagePhase::AwaitingResponse => 1,
            PagePhase::Rendered | PagePhase::ErrorLogged => 2,
        }
    }
}

impl fmt::Display for PagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
