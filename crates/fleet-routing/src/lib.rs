//! Vehicle routing problem model and fleet orchestration.
//!
//! The crate keeps the persisted fleet (vehicles and locations) consistent with
//! an external route planner, and moves whole routing problems in and out of the
//! YAML dataset format.

pub mod config;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod location;
pub mod portable;
pub mod repository;
pub mod telemetry;
pub mod vehicle;

pub use domain::{
    Coordinates, CoordinatesError, Location, LocationAttributes, LocationId, RoutingProblem,
    ValidationError, Vehicle, VehicleAttributes, VehicleId,
};
pub use repository::RepositoryError;
