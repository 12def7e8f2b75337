//! Resolved configuration: every default applied, every value validated.

use apiview_types::{MarkupPolicy, OutputSelector};
use url::Url;

use crate::ConfigError;

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub(crate) const DEFAULT_ENDPOINT: &str = "/api";
pub(crate) const DEFAULT_OUTPUT: &str = "#pre";
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("apiview/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub base_url: Url,
    pub endpoint: String,
    pub output: OutputSelector,
    pub user_agent: String,
    pub escape_markup: bool,
}

impl ResolvedConfig {
    pub(crate) fn new(
        base_url: &str,
        endpoint: String,
        output: &str,
        user_agent: String,
        escape_markup: bool,
    ) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| ConfigError::Invalid {
            field: "http.base_url",
            reason: format!("{base_url:?}: {e}"),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "http.base_url",
                reason: format!("unsupported scheme {:?}", base_url.scheme()),
            });
        }

        if endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "page.endpoint",
                reason: "must not be empty".to_string(),
            });
        }

        let output = OutputSelector::new(output).map_err(|e| ConfigError::Invalid {
            field: "page.output",
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            endpoint,
            output,
            user_agent,
            escape_markup,
        })
    }

    #[must_use]
    pub fn markup(&self) -> MarkupPolicy {
        MarkupPolicy::from_escape_flag(self.escape_markup)
    }
}
