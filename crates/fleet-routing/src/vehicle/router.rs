use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::repository::{VehiclePlanner, VehicleRepository};
use super::service::{VehicleService, VehicleServiceError};
use crate::domain::VehicleId;
use crate::error::error_response;
use crate::portable::{CapacityChange, NewVehicle, PortableVehicle};
use crate::repository::RepositoryError;

/// Router builder exposing the fleet over HTTP.
pub fn vehicle_router<R, P>(service: Arc<VehicleService<R, P>>) -> Router
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    Router::new()
        .route(
            "/api/v1/vehicles",
            get(list_handler::<R, P>)
                .post(create_handler::<R, P>)
                .delete(remove_all_handler::<R, P>),
        )
        .route("/api/v1/vehicles/custom", post(create_custom_handler::<R, P>))
        .route(
            "/api/v1/vehicles/remove-any",
            post(remove_any_handler::<R, P>),
        )
        .route(
            "/api/v1/vehicles/:vehicle_id",
            get(get_handler::<R, P>).delete(remove_handler::<R, P>),
        )
        .route(
            "/api/v1/vehicles/:vehicle_id/capacity",
            post(capacity_handler::<R, P>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R, P>(
    State(service): State<Arc<VehicleService<R, P>>>,
) -> Response
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    match service.vehicles() {
        Ok(mut vehicles) => {
            vehicles.sort_by_key(|vehicle| vehicle.id());
            let views: Vec<PortableVehicle> = vehicles.iter().map(PortableVehicle::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn create_handler<R, P>(
    State(service): State<Arc<VehicleService<R, P>>>,
) -> Response
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    match service.create_vehicle() {
        Ok(vehicle) => (StatusCode::CREATED, Json(PortableVehicle::from(&vehicle))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn create_custom_handler<R, P>(
    State(service): State<Arc<VehicleService<R, P>>>,
    Json(request): Json<NewVehicle>,
) -> Response
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    match service.create_vehicle_from(request) {
        Ok(vehicle) => (StatusCode::CREATED, Json(PortableVehicle::from(&vehicle))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn get_handler<R, P>(
    State(service): State<Arc<VehicleService<R, P>>>,
    Path(vehicle_id): Path<u64>,
) -> Response
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    match service.vehicle(VehicleId(vehicle_id)) {
        Ok(vehicle) => (StatusCode::OK, Json(PortableVehicle::from(&vehicle))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn remove_handler<R, P>(
    State(service): State<Arc<VehicleService<R, P>>>,
    Path(vehicle_id): Path<u64>,
) -> Response
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    match service.remove_vehicle(VehicleId(vehicle_id)) {
        Ok(vehicle) => (StatusCode::OK, Json(PortableVehicle::from(&vehicle))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn remove_any_handler<R, P>(
    State(service): State<Arc<VehicleService<R, P>>>,
) -> Response
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    match service.remove_any_vehicle() {
        Ok(Some(vehicle)) => {
            (StatusCode::OK, Json(PortableVehicle::from(&vehicle))).into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn remove_all_handler<R, P>(
    State(service): State<Arc<VehicleService<R, P>>>,
) -> Response
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    match service.remove_all() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn capacity_handler<R, P>(
    State(service): State<Arc<VehicleService<R, P>>>,
    Path(vehicle_id): Path<u64>,
    Json(change): Json<CapacityChange>,
) -> Response
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    match service.change_capacity(VehicleId(vehicle_id), change.capacity) {
        Ok(vehicle) => (StatusCode::OK, Json(PortableVehicle::from(&vehicle))).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: VehicleServiceError) -> Response {
    match error {
        VehicleServiceError::Validation(error) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        VehicleServiceError::Repository(error @ RepositoryError::NotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        VehicleServiceError::Repository(error) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}
