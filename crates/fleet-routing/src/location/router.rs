use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::info;

use super::repository::LocationRepository;
use crate::domain::{Coordinates, LocationId};
use crate::error::error_response;
use crate::portable::{NewLocation, PortableLocation};
use crate::repository::RepositoryError;

/// Router builder exposing location storage over HTTP.
pub fn location_router<L>(repository: Arc<L>) -> Router
where
    L: LocationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/locations",
            get(list_handler::<L>)
                .post(create_handler::<L>)
                .delete(remove_all_handler::<L>),
        )
        .route(
            "/api/v1/locations/:location_id",
            get(get_handler::<L>).delete(remove_handler::<L>),
        )
        .with_state(repository)
}

pub(crate) async fn list_handler<L>(State(repository): State<Arc<L>>) -> Response
where
    L: LocationRepository + 'static,
{
    match repository.locations() {
        Ok(mut locations) => {
            locations.sort_by_key(|location| location.id());
            let views: Vec<PortableLocation> =
                locations.iter().map(PortableLocation::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn create_handler<L>(
    State(repository): State<Arc<L>>,
    Json(request): Json<NewLocation>,
) -> Response
where
    L: LocationRepository + 'static,
{
    let coordinates = Coordinates::new(request.lat, request.lng);
    match repository.create_location(coordinates, &request.required_skill, &request.description) {
        Ok(location) => {
            info!(location = %location.full_description(), "location created");
            (StatusCode::CREATED, Json(PortableLocation::from(&location))).into_response()
        }
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn get_handler<L>(
    State(repository): State<Arc<L>>,
    Path(location_id): Path<u64>,
) -> Response
where
    L: LocationRepository + 'static,
{
    let id = LocationId(location_id);
    match repository.find(id) {
        Ok(Some(location)) => (StatusCode::OK, Json(PortableLocation::from(&location))).into_response(),
        Ok(None) => repository_error_response(RepositoryError::location_not_found(id)),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn remove_handler<L>(
    State(repository): State<Arc<L>>,
    Path(location_id): Path<u64>,
) -> Response
where
    L: LocationRepository + 'static,
{
    match repository.remove_location(LocationId(location_id)) {
        Ok(location) => {
            info!(location_id, "location removed");
            (StatusCode::OK, Json(PortableLocation::from(&location))).into_response()
        }
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn remove_all_handler<L>(State(repository): State<Arc<L>>) -> Response
where
    L: LocationRepository + 'static,
{
    match repository.remove_all() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => repository_error_response(error),
    }
}

fn repository_error_response(error: RepositoryError) -> Response {
    let status = match error {
        RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error.to_string())
}
