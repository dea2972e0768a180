use std::sync::Arc;

use anyhow::Context;
use chat_relay::{config::RelayConfig, routes, state::AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = RelayConfig::from_env().context("failed to load configuration")?;
    let state = Arc::new(AppState::new(&config)?);

    let sanitize = state.sanitizer.is_enabled();
    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(
        addr = %config.bind_addr,
        model = %config.upstream.model,
        sanitize,
        system_prompt = config.policy.inject_system_prompt,
        "chat relay listening"
    );
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
