//! Scrape Dash watcher
//!
//! Runs the dashboard headlessly against a live backend: initial load, then
//! the poll loop, rewriting an HTML snapshot of the page after every change.

use anyhow::Context;
use clap::Parser;
use scrape_dash::api::{DashboardApi, HttpApiClient};
use scrape_dash::config::Config;
use scrape_dash::controller::DashboardController;
use scrape_dash::model::{StatusFilter, Tab};
use scrape_dash::page::MemoryPage;
use scrape_dash::render::render_document;
use scrape_dash::state::UiState;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scrape-dash-watch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keep a live HTML snapshot of the scraper dashboard")]
struct Args {
    /// Config file (default: platform config dir, then ./scrape-dash.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Where the rendered page is written
    #[arg(short, long, default_value = "dashboard.html")]
    output: PathBuf,

    /// Initially active tab (create, tasks, accounts)
    #[arg(long, default_value = "tasks")]
    tab: Tab,

    /// Initial task filter (all, pending, running, completed, failed)
    #[arg(long, default_value = "all")]
    filter: StatusFilter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        config.backend.base_url = url;
    }

    scrape_dash::logging::init(&config.logging);
    tracing::info!("Scrape Dash watcher v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(backend = %config.backend.base_url, output = ?args.output, "Watching");

    let api = Arc::new(HttpApiClient::new(&config.backend).context("building HTTP client")?);
    match api.health().await {
        Ok(health) => tracing::info!(
            status = %health.status,
            database = ?health.database,
            active_scrapers = ?health.active_scrapers,
            "Backend reachable"
        ),
        Err(e) => tracing::warn!(error = %e, "Backend health check failed"),
    }

    let page = Arc::new(MemoryPage::new());
    let mut revisions = page.subscribe();

    let dashboard = DashboardController::new(
        api,
        page.clone(),
        &config,
        UiState::new(args.tab, args.filter),
    );
    dashboard.init().await;
    write_snapshot(&page, &args.output).await?;

    let polling = dashboard.start_polling();

    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                revisions.borrow_and_update();
                if let Err(e) = write_snapshot(&page, &args.output).await {
                    tracing::error!(error = %e, "Failed to write snapshot");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    polling.stop();
    write_snapshot(&page, &args.output).await?;
    tracing::info!(ticks = polling.ticks(), "Watcher stopped");
    Ok(())
}

async fn write_snapshot(page: &MemoryPage, path: &Path) -> anyhow::Result<()> {
    let html = page.with_snapshot(render_document);
    tokio::fs::write(path, html.as_str())
        .await
        .with_context(|| format!("writing {:?}", path))
}
