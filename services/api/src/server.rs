use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{AppState, SqliteTransactionRepository};
use crate::routes::with_transaction_routes;
use tarifa::config::AppConfig;
use tarifa::error::AppError;
use tarifa::telemetry;
use tarifa::transactions::{CommissionEngine, TransactionService};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(database) = args.database.take() {
        config.database.path = database;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = CommissionEngine::from_definitions(&config.rules)?;
    info!(rules = %engine.signature(), "commission rules loaded");

    let repository = Arc::new(
        SqliteTransactionRepository::open(&config.database.path)
            .map_err(|error| AppError::Storage(error.to_string()))?,
    );
    let service = Arc::new(TransactionService::new(repository, engine));

    let app = with_transaction_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, database = %config.database.path, "commission service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
