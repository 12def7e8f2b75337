//! Configuration for apiview.
//!
//! ```toml
//! [page]
//! endpoint = "/api"
//! output = "#pre"
//! escape_markup = false
//!
//! [http]
//! base_url = "http://localhost:8080"
//! user_agent = "apiview/0.0.0"
//! ```
//!
//! The file lives at `~/.apiview/config.toml`. A missing file means defaults.
//! String values may reference environment variables as `${VAR}`.
//! `APIVIEW_BASE_URL`, `APIVIEW_ENDPOINT` and `APIVIEW_OUTPUT` override the file.

mod resolved;

pub use resolved::ResolvedConfig;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};
use thiserror::Error;

pub const ENV_BASE_URL: &str = "APIVIEW_BASE_URL";
pub const ENV_ENDPOINT: &str = "APIVIEW_ENDPOINT";
pub const ENV_OUTPUT: &str = "APIVIEW_OUTPUT";

#[derive(Debug, Default, Deserialize)]
pub struct ApiviewConfig {
    pub page: Option<PageConfig>,
    pub http: Option<HttpConfig>,
}

/// `[page]`: what to fetch and where to write it.
#[derive(Debug, Default, Deserialize)]
pub struct PageConfig {
    /// Endpoint path, resolved against `http.base_url`. Default: `/api`.
    pub endpoint: Option<String>,
    /// Id selector of the output element. Default: `#pre`.
    pub output: Option<String>,
    /// HTML-escape the serialized response before writing it. Default: false.
    #[serde(default)]
    pub escape_markup: bool,
}

/// `[http]`: how the native host reaches the endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct HttpConfig {
    /// Origin the page is served from. Default: `http://localhost:8080`.
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Invalid { .. } => None,
        }
    }
}

/// Expand `${VAR}` references through `lookup`. Unset variables expand to
/// nothing.
fn expand_env_vars(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + end_rel];
        if !name.is_empty() {
            out.push_str(&lookup(name).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

impl ApiviewConfig {
    /// Load from the default path. `Ok(None)` if there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Apply defaults, `${VAR}` expansion and `APIVIEW_*` overrides.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(|name| env::var(name).ok())
    }

    /// [`Self::resolve`] with an explicit environment.
    pub fn resolve_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let page = self.page.as_ref();
        let http = self.http.as_ref();
        let expand = |raw: &String| expand_env_vars(raw, &env);

        let base_url = env(ENV_BASE_URL)
            .or_else(|| http.and_then(|h| h.base_url.as_ref()).map(expand))
            .unwrap_or_else(|| resolved::DEFAULT_BASE_URL.to_string());
        let endpoint = env(ENV_ENDPOINT)
            .or_else(|| page.and_then(|p| p.endpoint.as_ref()).map(expand))
            .unwrap_or_else(|| resolved::DEFAULT_ENDPOINT.to_string());
        let output = env(ENV_OUTPUT)
            .or_else(|| page.and_then(|p| p.output.as_ref()).map(expand))
            .unwrap_or_else(|| resolved::DEFAULT_OUTPUT.to_string());
        let user_agent = http
            .and_then(|h| h.user_agent.as_ref())
            .map(expand)
            .unwrap_or_else(|| resolved::DEFAULT_USER_AGENT.to_string());
        let escape_markup = page.is_some_and(|p| p.escape_markup);

        ResolvedConfig::new(&base_url, endpoint, &output, user_agent, escape_markup)
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".apiview").join("config.toml"))
}
