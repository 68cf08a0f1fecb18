use anyhow::Result;
use dest_agents::AppConfig;
use dest_api::build_app;
use dest_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("dest_api");

    let config = AppConfig::from_env()?;
    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(bind = %config.bind, model = %config.openai.model, "dest gpt api started");

    axum::serve(listener, app).await?;
    Ok(())
}
