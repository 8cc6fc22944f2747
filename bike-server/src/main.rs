use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bike_server::config::AppConfig;
use bike_server::refresher::{RefresherConfig, StationRefresher};
use bike_server::repository::StationRepository;
use bike_server::snapshot::SnapshotStore;
use bike_server::store::{HttpDocumentStore, InMemoryStore, PrimaryStore};
use bike_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bike_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");
    let snapshot = SnapshotStore::new(config.snapshot_config());

    let primary: Arc<dyn PrimaryStore> = match config.store.http_config() {
        Some(http) => {
            info!(url = %http.base_url, "using document store");
            Arc::new(HttpDocumentStore::new(http).expect("Failed to create store client"))
        }
        None => {
            info!("BIKES_STORE_URL not set, using in-memory store");
            Arc::new(InMemoryStore::default())
        }
    };

    let repository = Arc::new(StationRepository::new(primary, snapshot));

    if config.seed {
        let report = repository.seed_from_snapshot().await;
        if report.failed > 0 {
            warn!(failed = report.failed, "some stations could not be seeded");
        }
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let refresher = config.refresh.then(|| {
        let refresher = StationRefresher::new(repository.clone(), RefresherConfig::default());
        tokio::spawn(refresher.run(shutdown_tx.subscribe()))
    });

    let app = create_router(AppState::new(repository));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.bind_addr, "bike station server listening");
    info!("  GET  /health");
    info!("  GET  /api/stations");
    info!("  GET  /api/stations/summary");
    info!("  GET  /api/stations/{{number}}");
    info!("  POST /api/stations");
    info!("  PUT  /api/stations/{{number}}");

    let mut server_shutdown = shutdown_tx.subscribe();
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = signal_tx.send(());
    });

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.recv().await;
        })
        .await
    {
        error!(error = %e, "server error");
    }

    if let Some(handle) = refresher {
        let _ = handle.await;
    }
    info!("shutdown complete");
}

/// Wait for Ctrl-C or SIGTERM.
async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
