use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use flightinfo_api::{app, AppState};
use flightinfo_core::{FlightInfoService, FlightStore, InMemoryFlightStore};
use flightinfo_store::{app_config::Config, DbClient, PgFlightStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "flightinfo_api=debug,flightinfo_core=debug,flightinfo_store=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting flight info API on port {}", config.server.port);

    let (store, backend): (Arc<dyn FlightStore>, &str) = match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            let store: Arc<dyn FlightStore> = Arc::new(PgFlightStore::new(db.pool.clone()));
            (store, "postgres")
        }
        None => {
            tracing::warn!("database.url is not set, flights are kept in memory");
            let store: Arc<dyn FlightStore> = Arc::new(InMemoryFlightStore::new());
            (store, "memory")
        }
    };

    let service = FlightInfoService::new(store)
        .with_local_offset(config.search.local_offset()?)
        .with_span(tracing::info_span!("flight_info_service", backend));
    tracing::info!(
        "Flight store backend: {}, dates without offset are read at UTC{}",
        backend,
        service.local_offset()
    );
    let app = app(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
