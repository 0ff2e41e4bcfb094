use crate::infra::{AppState, FleetState};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use fleet_routing::dataset::{export_problem, replace_problem, DatasetMarshaller};
use fleet_routing::error::AppError;
use fleet_routing::location::location_router;
use fleet_routing::vehicle::vehicle_router;
use serde_json::json;
use tracing::info;

const YAML_CONTENT_TYPE: &str = "application/yaml";

pub(crate) fn with_fleet_routes(fleet: FleetState) -> Router {
    vehicle_router(fleet.service.clone())
        .merge(location_router(fleet.locations.clone()))
        .merge(dataset_router(fleet))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn dataset_router(fleet: FleetState) -> Router {
    Router::new()
        .route(
            "/api/v1/dataset",
            get(export_dataset_endpoint).put(replace_dataset_endpoint),
        )
        .with_state(fleet)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Current fleet as a YAML dataset, named after the last dataset loaded.
pub(crate) async fn export_dataset_endpoint(
    State(fleet): State<FleetState>,
) -> Result<Response, AppError> {
    let name = fleet.name();
    let problem = export_problem(&name, fleet.locations.as_ref(), fleet.vehicles.as_ref())?;
    let body = DatasetMarshaller::marshal(&problem)?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], body).into_response())
}

/// Replace the whole fleet with the dataset in the request body. The fleet
/// takes the dataset's name.
pub(crate) async fn replace_dataset_endpoint(
    State(fleet): State<FleetState>,
    body: String,
) -> Result<Json<serde_json::Value>, AppError> {
    let problem = DatasetMarshaller::unmarshal_str(&body)?;
    let summary = replace_problem(&problem, fleet.locations.as_ref(), fleet.service.as_ref())?;
    fleet.rename(problem.name());
    info!(
        problem = problem.name(),
        locations = summary.locations,
        vehicles = summary.vehicles,
        "fleet replaced from dataset"
    );
    Ok(Json(json!({
        "name": problem.name(),
        "locations": summary.locations,
        "vehicles": summary.vehicles,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use fleet_routing::config::FleetConfig;
    use fleet_routing::vehicle::PlannerNotification;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const DATASET: &str = "\
name: Prague
depot:
  description: Depot
  latitude: 50.0755
  longitude: 14.4378
  requiredSkill: depot
vehicles:
  - name: Van
    capacity: 6
    skillSet: [depot]
visits:
  - description: Clinic
    latitude: 50.1
    longitude: 14.5
";

    fn app(ready: bool) -> (Router, FleetState) {
        let fleet = FleetState::new("session", &FleetConfig::default());
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_fleet_routes(fleet.clone()).layer(Extension(state));
        (router, fleet)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    fn put_dataset(body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/api/v1/dataset")
            .header("content-type", YAML_CONTENT_TYPE)
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reflects_startup_state() {
        let (router, _fleet) = app(false);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn replacing_then_exporting_returns_the_dataset() {
        let (router, fleet) = app(true);

        let response = router
            .clone()
            .oneshot(put_dataset(DATASET))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(fleet
            .planner
            .events()
            .contains(&PlannerNotification::RemoveAllVehicles));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/dataset")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(YAML_CONTENT_TYPE.as_bytes())
        );

        let exported = DatasetMarshaller::unmarshal_str(&body_text(response).await)
            .expect("exported dataset parses");
        let expected = DatasetMarshaller::unmarshal_str(DATASET).expect("fixture parses");
        assert_eq!(exported.name(), "Prague");
        assert_eq!(exported.vehicles(), expected.vehicles());
        assert_eq!(exported.depot(), expected.depot());
        assert_eq!(exported.visits(), expected.visits());
    }

    #[tokio::test]
    async fn export_uses_session_name_until_a_dataset_is_loaded() {
        let (router, fleet) = app(true);
        let export = || {
            Request::builder()
                .uri("/api/v1/dataset")
                .body(Body::empty())
                .expect("request builds")
        };

        let response = router.clone().oneshot(export()).await.expect("router responds");
        let before = DatasetMarshaller::unmarshal_str(&body_text(response).await)
            .expect("exported dataset parses");
        assert_eq!(before.name(), "session");

        router
            .clone()
            .oneshot(put_dataset(DATASET))
            .await
            .expect("router responds");
        assert_eq!(&*fleet.name(), "Prague");

        let response = router.oneshot(export()).await.expect("router responds");
        let after = DatasetMarshaller::unmarshal_str(&body_text(response).await)
            .expect("exported dataset parses");
        assert_eq!(after.name(), "Prague");
    }

    #[tokio::test]
    async fn malformed_dataset_is_rejected() {
        let (router, fleet) = app(true);
        fleet.service.create_vehicle().expect("vehicle created");

        let response = router
            .oneshot(put_dataset("vehicles: 42\n"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("malformed dataset"));
        assert_eq!(&*fleet.name(), "session");
        assert_eq!(fleet.service.vehicles().expect("vehicles").len(), 1);
    }

    #[tokio::test]
    async fn fleet_routes_are_mounted() {
        let (router, _fleet) = app(true);
        let response = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/vehicles/42")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
