use skillgate_api::app::{build_app, services};
use skillgate_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    skillgate_observability::init();

    let config = ApiConfig::from_env()?;
    let store = services::build_store(&config).await?;
    let app = build_app(config.jwt_secret.clone(), store);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
