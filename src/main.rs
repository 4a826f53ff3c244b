//! Google Search Console MCP Server
//!
//! Bridges the Search Console API to the Model Context Protocol.

mod api;
mod auth;
mod config;
mod debug;
mod error;
mod provider;
mod reference;
mod rest;
mod server;
mod tools;

#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use crate::auth::{ServiceAccountAuth, ServiceAccountKey};
use crate::config::{Config, Overrides};
use crate::debug::DebugLogger;
use crate::provider::GoogleClientProvider;
use crate::reference::ReferenceData;
use crate::server::GscServer;
use crate::tools::Dispatcher;

#[derive(Parser, Debug)]
#[command(name = "gsc-mcp")]
#[command(author, version, about = "Google Search Console MCP Server", long_about = None)]
struct Args {
    /// Path to an optional JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the service account key file
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Search Console property to query (e.g. https://example.com/)
    #[arg(long, env = "GSC_SITE_URL")]
    site_url: Option<String>,

    /// Enable debug mode (traces all tool calls)
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(
        args.config.as_deref(),
        Overrides {
            credentials_path: args.credentials,
            site_url: args.site_url,
            debug: args.debug,
        },
    )?;

    // stdout carries protocol frames; logs go to stderr.
    let default_level = if config.debug { "gsc_mcp=debug" } else { "gsc_mcp=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let debug = Arc::new(DebugLogger::new(config.debug));
    if let Some(path) = debug.trace_path() {
        tracing::info!(path = %path.display(), "tool call trace enabled");
    }

    tracing::info!(site_url = config.site_url(), "gsc-mcp starting");

    let reference = Arc::new(ReferenceData::load(&config)?);

    // Validated as present by Config::load.
    let credentials_path = config.credentials_path.clone().unwrap_or_default();
    let key = ServiceAccountKey::from_file(&credentials_path)?;
    tracing::info!(client_email = %key.client_email, scope = %config.scope, "service account loaded");

    let auth = ServiceAccountAuth::new(key, &config)?;
    let provider = Arc::new(GoogleClientProvider::new(
        auth,
        config.api_base_url.clone(),
        config.timeout(),
    ));

    let dispatcher = Arc::new(Dispatcher::new(
        provider,
        reference,
        config.site_url(),
        debug.clone(),
    ));
    let server = GscServer::new(dispatcher);

    tracing::info!("serving MCP on stdio");
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    tracing::info!("gsc-mcp shutting down");
    Ok(())
}
