use fleet_routing::location::LocationRepository;
use fleet_routing::vehicle::{
    PlannerError, PlannerNotification, VehiclePlanner, VehicleRepository, VehicleService,
};
use fleet_routing::{
    Coordinates, Location, LocationAttributes, LocationId, RepositoryError, Vehicle,
    VehicleAttributes, VehicleId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::info;

pub(crate) type FleetService = VehicleService<InMemoryVehicleRepository, InMemoryVehiclePlanner>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything a running fleet needs, shared between routers and the CLI.
#[derive(Clone)]
pub(crate) struct FleetState {
    name: Arc<RwLock<Arc<str>>>,
    pub(crate) locations: Arc<InMemoryLocationRepository>,
    pub(crate) vehicles: Arc<InMemoryVehicleRepository>,
    pub(crate) planner: Arc<InMemoryVehiclePlanner>,
    pub(crate) service: Arc<FleetService>,
}

impl FleetState {
    pub(crate) fn new(name: impl Into<Arc<str>>, fleet: &fleet_routing::config::FleetConfig) -> Self {
        let locations = Arc::new(InMemoryLocationRepository::default());
        let vehicles = Arc::new(InMemoryVehicleRepository::default());
        let planner = Arc::new(InMemoryVehiclePlanner::default());
        let service = Arc::new(VehicleService::new(vehicles.clone(), planner.clone(), fleet));
        Self {
            name: Arc::new(RwLock::new(name.into())),
            locations,
            vehicles,
            planner,
            service,
        }
    }

    /// Name the fleet is exported under.
    pub(crate) fn name(&self) -> Arc<str> {
        self.name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn rename(&self, name: impl Into<Arc<str>>) {
        *self.name.write().unwrap_or_else(PoisonError::into_inner) = name.into();
    }
}

struct Table<K, V> {
    last_id: u64,
    rows: HashMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: HashMap::new(),
        }
    }
}

impl<K, V> Table<K, V> {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Ids keep counting up after removals, so an id is never handed out twice.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLocationRepository {
    table: Arc<Mutex<Table<LocationId, Location>>>,
}

impl LocationRepository for InMemoryLocationRepository {
    fn create_location(
        &self,
        coordinates: Coordinates,
        required_skill: &str,
        description: &str,
    ) -> Result<Location, RepositoryError> {
        let mut guard = self.table.lock().expect("location mutex poisoned");
        let id = LocationId(guard.next_id());
        let location = Location::new(
            id,
            LocationAttributes::new(coordinates, required_skill, description),
        );
        guard.rows.insert(id, location.clone());
        Ok(location)
    }

    fn locations(&self) -> Result<Vec<Location>, RepositoryError> {
        let guard = self.table.lock().expect("location mutex poisoned");
        Ok(guard.rows.values().cloned().collect())
    }

    fn remove_location(&self, id: LocationId) -> Result<Location, RepositoryError> {
        let mut guard = self.table.lock().expect("location mutex poisoned");
        guard
            .rows
            .remove(&id)
            .ok_or_else(|| RepositoryError::location_not_found(id))
    }

    fn remove_all(&self) -> Result<(), RepositoryError> {
        let mut guard = self.table.lock().expect("location mutex poisoned");
        guard.rows.clear();
        Ok(())
    }

    fn find(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        let guard = self.table.lock().expect("location mutex poisoned");
        Ok(guard.rows.get(&id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryVehicleRepository {
    table: Arc<Mutex<Table<VehicleId, Vehicle>>>,
}

impl InMemoryVehicleRepository {
    fn insert_with(&self, build: impl FnOnce(VehicleId) -> VehicleAttributes) -> Vehicle {
        let mut guard = self.table.lock().expect("vehicle mutex poisoned");
        let id = VehicleId(guard.next_id());
        let vehicle = Vehicle::new(id, build(id));
        guard.rows.insert(id, vehicle.clone());
        vehicle
    }
}

impl VehicleRepository for InMemoryVehicleRepository {
    fn create_vehicle(&self, attributes: VehicleAttributes) -> Result<Vehicle, RepositoryError> {
        Ok(self.insert_with(|_| attributes))
    }

    fn create_unnamed_vehicle(
        &self,
        capacity: i32,
        skill_set: BTreeSet<String>,
    ) -> Result<Vehicle, RepositoryError> {
        Ok(self.insert_with(|id| {
            VehicleAttributes::new(format!("Vehicle {id}"), capacity, skill_set)
        }))
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let guard = self.table.lock().expect("vehicle mutex poisoned");
        Ok(guard.rows.values().cloned().collect())
    }

    fn find(&self, id: VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        let guard = self.table.lock().expect("vehicle mutex poisoned");
        Ok(guard.rows.get(&id).cloned())
    }

    fn remove_vehicle(&self, id: VehicleId) -> Result<Vehicle, RepositoryError> {
        let mut guard = self.table.lock().expect("vehicle mutex poisoned");
        guard
            .rows
            .remove(&id)
            .ok_or_else(|| RepositoryError::vehicle_not_found(id))
    }

    fn remove_all(&self) -> Result<(), RepositoryError> {
        let mut guard = self.table.lock().expect("vehicle mutex poisoned");
        guard.rows.clear();
        Ok(())
    }

    fn change_capacity(&self, id: VehicleId, capacity: i32) -> Result<Vehicle, RepositoryError> {
        let mut guard = self.table.lock().expect("vehicle mutex poisoned");
        let vehicle = guard
            .rows
            .remove(&id)
            .ok_or_else(|| RepositoryError::vehicle_not_found(id))?
            .with_capacity(capacity);
        guard.rows.insert(id, vehicle.clone());
        Ok(vehicle)
    }
}

/// Stand-in for a real route planner: logs and remembers every update.
#[derive(Default, Clone)]
pub(crate) struct InMemoryVehiclePlanner {
    events: Arc<Mutex<Vec<PlannerNotification>>>,
}

impl InMemoryVehiclePlanner {
    pub(crate) fn events(&self) -> Vec<PlannerNotification> {
        self.events.lock().expect("planner mutex poisoned").clone()
    }

    fn accept(&self, notification: PlannerNotification) -> Result<(), PlannerError> {
        info!(%notification, "planner updated");
        let mut guard = self.events.lock().expect("planner mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl VehiclePlanner for InMemoryVehiclePlanner {
    fn add_vehicle(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.accept(PlannerNotification::AddVehicle(vehicle.clone()))
    }

    fn remove_vehicle(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.accept(PlannerNotification::RemoveVehicle(vehicle.clone()))
    }

    fn remove_all_vehicles(&self) -> Result<(), PlannerError> {
        self.accept(PlannerNotification::RemoveAllVehicles)
    }

    fn change_capacity(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.accept(PlannerNotification::ChangeCapacity(vehicle.clone()))
    }
}
