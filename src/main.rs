//! A web server for viewing publicly shared drops.
//!
//! Each drop's details are fetched from the remote content API. Images are displayed front and
//! center, bookmarks redirect to their destination, text is shown inline, and anything else gets a
//! download link.

mod api;
mod config;
mod domain;
mod drops;
mod error;
mod pages;
pub(crate) mod percent_encoding;
pub(crate) mod response;
mod routes;
mod services;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// The state shared by all request handlers.
#[derive(Clone, Debug)]
pub(crate) struct AppState {
    /// The client for the remote content API.
    pub(crate) api: api::Client,

    /// The server's configuration.
    pub(crate) config: Arc<Config>,
}

/// # Errors
///
/// See implementation.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let api = api::Client::new(config.api_origin.clone(), config.api_timeout)?;

    tracing::info!(api_origin = %config.api_origin, "using remote API");

    let listener = TcpListener::bind(config.address).await?;

    tracing::info!(address = %config.address, "listening");

    let router = services::router(AppState {
        api,
        config: Arc::new(config),
    });

    axum::serve(listener, router).await?;

    Ok(())
}
