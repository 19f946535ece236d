use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryBuyers, InMemoryOffers, InMemoryProperties, InMemorySellers,
    LoggingNotificationGateway,
};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_hub::config::AppConfig;
use estate_hub::error::AppError;
use estate_hub::marketplace::{MarketplaceApi, MarketplaceStores};
use estate_hub::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let api = Arc::new(MarketplaceApi::new(
        MarketplaceStores {
            properties: Arc::new(InMemoryProperties::default()),
            offers: Arc::new(InMemoryOffers::default()),
            buyers: Arc::new(InMemoryBuyers::default()),
            sellers: Arc::new(InMemorySellers::default()),
        },
        Arc::new(LoggingNotificationGateway::default()),
        config.notifications.clone(),
    ));

    let app = with_marketplace_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "offer lifecycle service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
