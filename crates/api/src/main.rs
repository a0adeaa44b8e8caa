use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use registrovivo_api::{build_router, state::AppState};
use registrovivo_config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let settings = Settings::load().context("failed to load configuration")?;

    let db = registrovivo_db::connect(&settings.database)
        .await
        .context("failed to connect to MongoDB")?;
    registrovivo_db::indexes::ensure_indexes(&db)
        .await
        .context("failed to ensure indexes")?;

    let app = build_router(AppState::new(&db));

    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "RegistroVivo API listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
