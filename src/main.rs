use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use satisfaction_predictor::{config::Config, server, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "satisfaction_predictor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env();

    // Model and reference data are required; without them there is nothing to serve.
    let ctx = AppContext::init(&cfg).with_context(|| {
        format!(
            "startup failed (MODEL_PATH={}, DATASET_PATH={})",
            cfg.model_path, cfg.dataset_path
        )
    })?;

    let app = server::router(server::AppState::new(ctx));

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], cfg.port));
    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
