use crate::cli::ServeArgs;
use crate::infra::{AppState, FleetState};
use crate::routes::with_fleet_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fleet_routing::config::AppConfig;
use fleet_routing::dataset::{seed_problem, DatasetMarshaller};
use fleet_routing::error::AppError;
use fleet_routing::telemetry;
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
    if let Some(dataset) = args.dataset.take() {
        config.fleet.dataset = Some(dataset);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let fleet = match &config.fleet.dataset {
        Some(path) => {
            let problem = DatasetMarshaller::from_path(path)?;
            let fleet = FleetState::new(problem.name(), &config.fleet);
            let summary = seed_problem(&problem, fleet.locations.as_ref(), fleet.service.as_ref())?;
            info!(
                dataset = %path.display(),
                locations = summary.locations,
                vehicles = summary.vehicles,
                "fleet seeded from dataset"
            );
            fleet
        }
        None => FleetState::new("fleet", &config.fleet),
    };

    let app = with_fleet_routes(fleet)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "fleet routing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
