//! Vehicle lifecycle kept in step between storage and the route planner.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{
    PlannerDivergence, PlannerError, PlannerNotification, VehiclePlanner, VehicleRepository,
};
pub use router::vehicle_router;
pub use service::{VehicleService, VehicleServiceError};
