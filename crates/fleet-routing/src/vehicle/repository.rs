use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::{Vehicle, VehicleAttributes, VehicleId};
use crate::repository::RepositoryError;

/// Storage abstraction for vehicles. Every call is one atomic unit against the
/// backing store, and the repository is the only source of vehicle ids.
pub trait VehicleRepository: Send + Sync {
    fn create_vehicle(&self, attributes: VehicleAttributes) -> Result<Vehicle, RepositoryError>;

    /// Create a vehicle the repository names itself (`Vehicle <id>`).
    fn create_unnamed_vehicle(
        &self,
        capacity: i32,
        skill_set: BTreeSet<String>,
    ) -> Result<Vehicle, RepositoryError>;

    fn vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError>;

    fn find(&self, id: VehicleId) -> Result<Option<Vehicle>, RepositoryError>;

    fn remove_vehicle(&self, id: VehicleId) -> Result<Vehicle, RepositoryError>;

    fn remove_all(&self) -> Result<(), RepositoryError>;

    /// Store a new capacity and return the updated vehicle.
    fn change_capacity(&self, id: VehicleId, capacity: i32) -> Result<Vehicle, RepositoryError>;
}

/// Outbound notifications to the route planner. Delivery is best effort: an
/// error tells the caller the planner missed an update, nothing more.
pub trait VehiclePlanner: Send + Sync {
    fn add_vehicle(&self, vehicle: &Vehicle) -> Result<(), PlannerError>;
    fn remove_vehicle(&self, vehicle: &Vehicle) -> Result<(), PlannerError>;
    fn remove_all_vehicles(&self) -> Result<(), PlannerError>;
    fn change_capacity(&self, vehicle: &Vehicle) -> Result<(), PlannerError>;
}

/// Planner dispatch error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("planner unavailable: {0}")]
    Unavailable(String),
    #[error("planner rejected update: {0}")]
    Rejected(String),
}

/// A single planner update, kept around so it can be replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerNotification {
    AddVehicle(Vehicle),
    RemoveVehicle(Vehicle),
    RemoveAllVehicles,
    ChangeCapacity(Vehicle),
}

impl PlannerNotification {
    pub fn deliver<P>(&self, planner: &P) -> Result<(), PlannerError>
    where
        P: VehiclePlanner + ?Sized,
    {
        match self {
            Self::AddVehicle(vehicle) => planner.add_vehicle(vehicle),
            Self::RemoveVehicle(vehicle) => planner.remove_vehicle(vehicle),
            Self::RemoveAllVehicles => planner.remove_all_vehicles(),
            Self::ChangeCapacity(vehicle) => planner.change_capacity(vehicle),
        }
    }

    pub fn vehicle_id(&self) -> Option<VehicleId> {
        match self {
            Self::AddVehicle(vehicle)
            | Self::RemoveVehicle(vehicle)
            | Self::ChangeCapacity(vehicle) => Some(vehicle.id()),
            Self::RemoveAllVehicles => None,
        }
    }
}

impl fmt::Display for PlannerNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddVehicle(vehicle) => write!(f, "add vehicle {}", vehicle.id()),
            Self::RemoveVehicle(vehicle) => write!(f, "remove vehicle {}", vehicle.id()),
            Self::RemoveAllVehicles => f.write_str("remove all vehicles"),
            Self::ChangeCapacity(vehicle) => write!(
                f,
                "change capacity of vehicle {} to {}",
                vehicle.id(),
                vehicle.capacity()
            ),
        }
    }
}

/// A committed repository change the planner never heard about.
#[derive(Debug, Clone)]
pub struct PlannerDivergence {
    pub notification: PlannerNotification,
    pub error: PlannerError,
    pub recorded_at: DateTime<Utc>,
}

impl PlannerDivergence {
    pub(crate) fn new(notification: PlannerNotification, error: PlannerError) -> Self {
        Self {
            notification,
            error,
            recorded_at: Utc::now(),
        }
    }
}
