use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eips_insight::api::{self, AppState};
use eips_insight::config::AppConfig;
use eips_insight::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eips_insight=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EIPsInsight analytics service");

    let config = AppConfig::load()?;
    info!("Configuration loaded");

    let store = Store::connect(&config.database_url).await?;
    info!("Database connected");

    store.run_migrations().await?;

    let addr = SocketAddr::new(config.server_host.parse()?, config.server_port);
    let app = api::router(AppState { config, store }).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .into_inner(),
    );

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
