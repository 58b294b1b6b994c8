use anyhow::Context;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

mod api;
mod config;
mod error;
mod service;
mod state;
mod storage;
#[cfg(test)]
mod tests;
mod utils;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = pretty_env_logger::try_init_timed();

    info!("Starting dappsmith...");

    let config = config::build_config()?;
    let state = AppState::new(config)?;

    if let Err(e) = state.store.probe().await {
        warn!("Store probe failed, user records may not persist: {}", e);
    }

    let addr = state.config.server.addr;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
