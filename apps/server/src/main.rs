use anyhow::Context;
use finance_store::SqliteStore;
use fintrack_server::config::Config;
use fintrack_server::{create_app, create_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    if config.uses_dev_secret() {
        tracing::warn!("Using development JWT secret, set FINTRACK_JWT_SECRET in production");
    }

    let store = SqliteStore::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))?;

    let addr = config.server_addr();
    let state = create_state(config, store);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
