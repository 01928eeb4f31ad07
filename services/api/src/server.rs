use crate::cli::ServeArgs;
use crate::infra::{build_engine, AppState};
use crate::routes::with_gauge_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rapture_gauge::config::AppConfig;
use rapture_gauge::error::AppError;
use rapture_gauge::gauge::alerts::{ConditionMonitor, TracingAlertPublisher};
use rapture_gauge::gauge::router::GaugeState;
use rapture_gauge::gauge::schedule::{run_schedule, Clock, SystemClock};
use rapture_gauge::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

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

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut engine = build_engine(&config.gauge, None)?;
    engine.refresh(clock.today());
    let engine = engine.into_shared();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor = ConditionMonitor::new(Arc::new(TracingAlertPublisher));
    let scheduler = tokio::spawn(run_schedule(
        engine.clone(),
        clock.clone(),
        config.gauge.schedule(),
        Some(monitor),
        shutdown_rx,
    ));

    let app = with_gauge_routes(GaugeState { engine, clock })
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "readiness gauge ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    readiness_flag.store(false, Ordering::Release);
    shutdown_tx.send(true).ok();
    if let Err(error) = scheduler.await {
        warn!(%error, "recompute schedule ended abnormally");
    }
    Ok(())
}
