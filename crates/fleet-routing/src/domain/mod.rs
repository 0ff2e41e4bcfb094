mod coordinates;
mod location;
mod problem;
mod vehicle;

pub use coordinates::{Coordinates, CoordinatesError};
pub use location::{Location, LocationAttributes, LocationId};
pub use problem::RoutingProblem;
pub use vehicle::{ValidationError, Vehicle, VehicleAttributes, VehicleId};
