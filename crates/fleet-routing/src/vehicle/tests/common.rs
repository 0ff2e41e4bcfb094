use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::FleetConfig;
use crate::domain::{Vehicle, VehicleAttributes, VehicleId};
use crate::repository::RepositoryError;
use crate::vehicle::repository::{
    PlannerError, PlannerNotification, VehiclePlanner, VehicleRepository,
};
use crate::vehicle::{vehicle_router, VehicleService};

pub(super) fn fleet_config() -> FleetConfig {
    FleetConfig {
        default_capacity: 10,
        default_skill: "depot".to_string(),
        dataset: None,
    }
}

pub(super) fn van(name: &str, capacity: i32) -> VehicleAttributes {
    VehicleAttributes::new(name, capacity, ["depot"])
}

pub(super) fn build_service() -> (
    VehicleService<MemoryRepository, RecordingPlanner>,
    Arc<MemoryRepository>,
    Arc<RecordingPlanner>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let planner = Arc::new(RecordingPlanner::watching(repository.as_ref().clone()));
    let service = VehicleService::new(repository.clone(), planner.clone(), &fleet_config());
    (service, repository, planner)
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    vehicles: BTreeMap<VehicleId, Vehicle>,
}

/// Repository that lets tests choose ids explicitly.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub(super) fn insert_with_id(&self, id: u64, attributes: VehicleAttributes) -> Vehicle {
        let vehicle = Vehicle::new(VehicleId(id), attributes);
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.next_id = state.next_id.max(id + 1);
        state.vehicles.insert(vehicle.id(), vehicle.clone());
        vehicle
    }

    pub(super) fn ids(&self) -> Vec<u64> {
        let state = self.state.lock().expect("repository mutex poisoned");
        state.vehicles.keys().map(|id| id.0).collect()
    }

    fn store(&self, build: impl FnOnce(VehicleId) -> VehicleAttributes) -> Vehicle {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        let id = VehicleId(state.next_id);
        state.next_id += 1;
        let vehicle = Vehicle::new(id, build(id));
        state.vehicles.insert(id, vehicle.clone());
        vehicle
    }
}

impl VehicleRepository for MemoryRepository {
    fn create_vehicle(&self, attributes: VehicleAttributes) -> Result<Vehicle, RepositoryError> {
        Ok(self.store(|_| attributes))
    }

    fn create_unnamed_vehicle(
        &self,
        capacity: i32,
        skill_set: BTreeSet<String>,
    ) -> Result<Vehicle, RepositoryError> {
        Ok(self.store(|id| VehicleAttributes::new(format!("Vehicle {id}"), capacity, skill_set)))
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        // reverse order so callers cannot rely on ascending ids
        Ok(state.vehicles.values().rev().cloned().collect())
    }

    fn find(&self, id: VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.vehicles.get(&id).cloned())
    }

    fn remove_vehicle(&self, id: VehicleId) -> Result<Vehicle, RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state
            .vehicles
            .remove(&id)
            .ok_or_else(|| RepositoryError::vehicle_not_found(id))
    }

    fn remove_all(&self) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.vehicles.clear();
        Ok(())
    }

    fn change_capacity(&self, id: VehicleId, capacity: i32) -> Result<Vehicle, RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        let vehicle = state
            .vehicles
            .remove(&id)
            .ok_or_else(|| RepositoryError::vehicle_not_found(id))?
            .with_capacity(capacity);
        state.vehicles.insert(id, vehicle.clone());
        Ok(vehicle)
    }
}

/// Planner that records every notification and can be switched off. When it
/// watches a repository it also notes the fleet size each time it is told to
/// clear the fleet.
#[derive(Default, Clone)]
pub(super) struct RecordingPlanner {
    events: Arc<Mutex<Vec<PlannerNotification>>>,
    offline: Arc<AtomicBool>,
    watched: Option<MemoryRepository>,
    fleet_sizes_at_clear: Arc<Mutex<Vec<usize>>>,
}

impl RecordingPlanner {
    pub(super) fn watching(repository: MemoryRepository) -> Self {
        Self {
            watched: Some(repository),
            ..Self::default()
        }
    }

    pub(super) fn fleet_sizes_at_clear(&self) -> Vec<usize> {
        self.fleet_sizes_at_clear
            .lock()
            .expect("planner mutex poisoned")
            .clone()
    }

    /// Capacity carried by the last update the planner accepted for `id`.
    pub(super) fn last_capacity(&self, id: VehicleId) -> Option<i32> {
        self.events()
            .iter()
            .rev()
            .find_map(|event| match event {
                PlannerNotification::AddVehicle(vehicle)
                | PlannerNotification::ChangeCapacity(vehicle)
                    if vehicle.id() == id =>
                {
                    Some(vehicle.capacity())
                }
                _ => None,
            })
    }

    pub(super) fn events(&self) -> Vec<PlannerNotification> {
        self.events.lock().expect("planner mutex poisoned").clone()
    }

    pub(super) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn record(&self, notification: PlannerNotification) -> Result<(), PlannerError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(PlannerError::Unavailable("planner offline".to_string()));
        }
        self.events
            .lock()
            .expect("planner mutex poisoned")
            .push(notification);
        Ok(())
    }
}

impl VehiclePlanner for RecordingPlanner {
    fn add_vehicle(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.record(PlannerNotification::AddVehicle(vehicle.clone()))
    }

    fn remove_vehicle(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.record(PlannerNotification::RemoveVehicle(vehicle.clone()))
    }

    fn remove_all_vehicles(&self) -> Result<(), PlannerError> {
        if let Some(repository) = &self.watched {
            self.fleet_sizes_at_clear
                .lock()
                .expect("planner mutex poisoned")
                .push(repository.ids().len());
        }
        self.record(PlannerNotification::RemoveAllVehicles)
    }

    fn change_capacity(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.record(PlannerNotification::ChangeCapacity(vehicle.clone()))
    }
}

pub(super) struct UnavailableRepository;

impl VehicleRepository for UnavailableRepository {
    fn create_vehicle(&self, _attributes: VehicleAttributes) -> Result<Vehicle, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create_unnamed_vehicle(
        &self,
        _capacity: i32,
        _skill_set: BTreeSet<String>,
    ) -> Result<Vehicle, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _id: VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove_vehicle(&self, _id: VehicleId) -> Result<Vehicle, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove_all(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn change_capacity(&self, _id: VehicleId, _capacity: i32) -> Result<Vehicle, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service(
    service: VehicleService<MemoryRepository, RecordingPlanner>,
) -> axum::Router {
    vehicle_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
