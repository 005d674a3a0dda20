use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use staffdesk_api::api_client::HttpTransport;
use staffdesk_api::config::Config;
use staffdesk_api::routes::build_router;
use staffdesk_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting staffdesk API v{}", env!("CARGO_PKG_VERSION"));

    let transport = HttpTransport::new(
        config.upstream_api_url.clone(),
        config.upstream_api_token.clone(),
        config.upstream_timeout,
    )?;
    info!(
        "Upstream API at {} (auth: {})",
        config.upstream_api_url,
        if config.upstream_api_token.is_some() { "bearer" } else { "none" }
    );

    let state = AppState::new(config.clone(), Arc::new(transport));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
