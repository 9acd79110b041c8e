use std::sync::Arc;

use filigree_api::axum;
use filigree_api::config::Config;
use filigree_api::{construct_router, state::State};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Filigree API service");

    let config = Config::from_env()?;
    let port = config.port;

    if config.gateway.is_none() {
        tracing::warn!(
            "Payment gateway not configured. \
            Set GATEWAY_KEY_ID and GATEWAY_KEY_SECRET to enable checkout."
        );
    }
    if config.mail.is_none() {
        tracing::warn!("SMTP not configured, confirmation mails are disabled.");
    }

    let state = Arc::new(State::new(config).await?);
    let app = construct_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
