//!
//! PetroTap order engine service.
//! Reads configuration from TOML file (~/.config/petrotap/config.toml).

use std::sync::Arc;

use tracing::{error, info, warn};

use petrotap::api::ApiState;
use petrotap::application::services::{
    ChargingService, DispatchService, EarningsService, OrderService, PaymentSyncService,
    PricingContext,
};
use petrotap::auth::JwtConfig;
use petrotap::config::AppConfig;
use petrotap::domain::pricing::Coordinates;
use petrotap::infrastructure::external::{HttpGeocoder, HttpPaymentGateway, HttpPushSender};
use petrotap::notifications::NotificationDispatcher;
use petrotap::shared::shutdown::ShutdownCoordinator;
use petrotap::{
    create_api_router, create_event_bus, default_config_path, init_database,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PETROTAP_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting PetroTap order engine...");

    // Prometheus recorder must be installed before any metrics calls
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    let jwt_config = JwtConfig::from_security(&app_cfg.security);

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&app_cfg.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };
    let repos: Arc<dyn petrotap::domain::RepositoryProvider> =
        Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // ── Outbound collaborators ─────────────────────────────────
    let gateway = Arc::new(HttpPaymentGateway::new(&app_cfg.external)?);
    let geocoder = Arc::new(HttpGeocoder::new(&app_cfg.external)?);
    let push = Arc::new(HttpPushSender::new(&app_cfg.external)?);

    // ── Event bus and push dispatch ────────────────────────────
    let event_bus = create_event_bus();

    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    let dispatcher = Arc::new(NotificationDispatcher::new(event_bus.clone(), push));
    dispatcher.start(shutdown_signal.clone());

    // ── Services ───────────────────────────────────────────────
    let pricing = PricingContext {
        config: app_cfg.pricing.clone(),
        origin: Coordinates::new(app_cfg.company.origin_lat, app_cfg.company.origin_lon),
        state_code: app_cfg.company.state_code.clone(),
    };

    let state = ApiState {
        orders: Arc::new(OrderService::new(
            repos.clone(),
            event_bus.clone(),
            pricing.clone(),
        )),
        charging: Arc::new(ChargingService::new(
            repos.clone(),
            event_bus.clone(),
            pricing.clone(),
        )),
        dispatch: Arc::new(DispatchService::new(repos.clone(), event_bus.clone())),
        payments: Arc::new(PaymentSyncService::new(
            repos.clone(),
            gateway.clone(),
            event_bus.clone(),
            app_cfg.payouts.currency.clone(),
        )),
        earnings: Arc::new(EarningsService::new(
            repos.clone(),
            gateway,
            event_bus.clone(),
            app_cfg.payouts.min_payout,
            app_cfg.payouts.currency.clone(),
        )),
        repos,
        geocoder,
        pricing: app_cfg.pricing.clone(),
        metrics: prometheus_handle,
    };

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(state, jwt_config);

    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }

    info!("PetroTap order engine shutdown complete");
    Ok(())
}
