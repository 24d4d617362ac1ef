use std::net::SocketAddr;
use std::sync::Arc;

use marquee_api::{app, AppState};
use marquee_core::pricing::FlatPolicy;
use marquee_core::{BookingEngine, ExpirySweep};
use marquee_store::{DbClient, PostgresCatalogStore, PostgresReservationLedger};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_api=debug,marquee_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = marquee_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Marquee API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let catalog = Arc::new(PostgresCatalogStore::new(db.pool.clone()));
    let ledger = Arc::new(PostgresReservationLedger::new(db.pool.clone()));

    let engine = Arc::new(BookingEngine::new(
        catalog.clone(),
        ledger.clone(),
        Arc::new(FlatPolicy),
    ));
    let sweep = Arc::new(ExpirySweep::new(
        ledger.clone(),
        config.sweep.older_than_minutes,
    ));

    tokio::spawn(marquee_api::worker::start_expiry_worker(
        sweep.clone(),
        config.sweep.interval_seconds,
    ));

    let app_state = AppState {
        engine,
        sweep,
        catalog,
        ledger,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
