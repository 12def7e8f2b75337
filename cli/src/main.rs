//! apiview CLI - runs the page script against an in-memory document.
//!
//! # Flow
//!
//! ```text
//! main() -> load config -> MemoryDocument(loading, #pre) -> Page::run()
//!                                   |
//!                        fire_content_loaded() -> GET /api -> #pre.innerHTML
//! ```
//!
//! The rendered element content goes to stdout. Logs go to stderr, filtered by
//! `RUST_LOG` (default `info`).

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use apiview_config::{ApiviewConfig, ResolvedConfig};
use apiview_dom::{Document, MemoryDocument};
use apiview_engine::{Page, PagePhase, PageSettings};
use apiview_types::ReadyState;
use apiview_webfetch::JsonFetcher;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the rendered element; keep logs off it.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_config() -> Result<ResolvedConfig> {
    let config = match ApiviewConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            tracing::warn!("{err}; using defaults");
            ApiviewConfig::default()
        }
    };
    config.resolve().context("invalid configuration")
}

fn build_fetcher(config: &ResolvedConfig) -> Result<JsonFetcher> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("failed to build HTTP client")?;
    Ok(JsonFetcher::new(client, config.base_url.clone()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;
    tracing::info!(
        base_url = %config.base_url,
        endpoint = %config.endpoint,
        output = %config.output,
        "starting page"
    );

    let fetcher = build_fetcher(&config)?;
    let document =
        Arc::new(MemoryDocument::new(ReadyState::Loading).with_element(config.output.id(), ""));

    let settings = PageSettings {
        endpoint: config.endpoint.clone(),
        output: config.output.clone(),
        markup: config.markup(),
    };
    let run = Page::new(Arc::clone(&document), fetcher, settings).run();

    document.fire_content_loaded();
    let phase = run.finish().await.context("page script failed")?;
    document.finish_loading();

    match phase {
        PagePhase::Rendered => {
            let html = document.inner_html(&config.output)?;
            let mut out = io::stdout().lock();
            writeln!(out, "{html}")?;
            out.flush()?;
        }
        other => tracing::info!(phase = %other, "nothing rendered"),
    }

    Ok(())
}
