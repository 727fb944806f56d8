use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use rollbook::logging::init_tracing;
use rollbook::router::init_router;
use rollbook::state::init_app_state;
use rollbook_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let log_dir = ServerConfig::from_env().log_dir;
    init_tracing(&log_dir).with_context(|| format!("Failed to create log directory {log_dir}"))?;

    let state = init_app_state().await?;
    let address = state.server_config.bind_address();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("Server running on http://{}", address);
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await?;
    Ok(())
}
