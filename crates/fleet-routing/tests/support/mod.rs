#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use fleet_routing::config::FleetConfig;
use fleet_routing::location::LocationRepository;
use fleet_routing::vehicle::{
    PlannerError, PlannerNotification, VehiclePlanner, VehicleRepository, VehicleService,
};
use fleet_routing::{
    Coordinates, Location, LocationAttributes, LocationId, RepositoryError, Vehicle,
    VehicleAttributes, VehicleId,
};

#[derive(Default)]
pub struct Fleet {
    pub locations: Arc<Locations>,
    pub vehicles: Arc<Vehicles>,
    pub planner: Arc<Planner>,
}

impl Fleet {
    pub fn service(&self) -> VehicleService<Vehicles, Planner> {
        VehicleService::new(
            self.vehicles.clone(),
            self.planner.clone(),
            &FleetConfig::default(),
        )
    }
}

#[derive(Default)]
pub struct Locations {
    state: Mutex<(u64, BTreeMap<LocationId, Location>)>,
}

impl LocationRepository for Locations {
    fn create_location(
        &self,
        coordinates: Coordinates,
        required_skill: &str,
        description: &str,
    ) -> Result<Location, RepositoryError> {
        let mut state = self.state.lock().expect("locations mutex poisoned");
        state.0 += 1;
        let id = LocationId(state.0);
        let location = Location::new(
            id,
            LocationAttributes::new(coordinates, required_skill, description),
        );
        state.1.insert(id, location.clone());
        Ok(location)
    }

    fn locations(&self) -> Result<Vec<Location>, RepositoryError> {
        let state = self.state.lock().expect("locations mutex poisoned");
        Ok(state.1.values().cloned().collect())
    }

    fn remove_location(&self, id: LocationId) -> Result<Location, RepositoryError> {
        let mut state = self.state.lock().expect("locations mutex poisoned");
        state
            .1
            .remove(&id)
            .ok_or_else(|| RepositoryError::location_not_found(id))
    }

    fn remove_all(&self) -> Result<(), RepositoryError> {
        self.state
            .lock()
            .expect("locations mutex poisoned")
            .1
            .clear();
        Ok(())
    }

    fn find(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        let state = self.state.lock().expect("locations mutex poisoned");
        Ok(state.1.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct Vehicles {
    state: Mutex<(u64, BTreeMap<VehicleId, Vehicle>)>,
}

impl Vehicles {
    fn insert(&self, build: impl FnOnce(VehicleId) -> VehicleAttributes) -> Vehicle {
        let mut state = self.state.lock().expect("vehicles mutex poisoned");
        state.0 += 1;
        let id = VehicleId(state.0);
        let vehicle = Vehicle::new(id, build(id));
        state.1.insert(id, vehicle.clone());
        vehicle
    }
}

impl VehicleRepository for Vehicles {
    fn create_vehicle(&self, attributes: VehicleAttributes) -> Result<Vehicle, RepositoryError> {
        Ok(self.insert(|_| attributes))
    }

    fn create_unnamed_vehicle(
        &self,
        capacity: i32,
        skill_set: BTreeSet<String>,
    ) -> Result<Vehicle, RepositoryError> {
        Ok(self.insert(|id| VehicleAttributes::new(format!("Vehicle {id}"), capacity, skill_set)))
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let state = self.state.lock().expect("vehicles mutex poisoned");
        Ok(state.1.values().cloned().collect())
    }

    fn find(&self, id: VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        let state = self.state.lock().expect("vehicles mutex poisoned");
        Ok(state.1.get(&id).cloned())
    }

    fn remove_vehicle(&self, id: VehicleId) -> Result<Vehicle, RepositoryError> {
        let mut state = self.state.lock().expect("vehicles mutex poisoned");
        state
            .1
            .remove(&id)
            .ok_or_else(|| RepositoryError::vehicle_not_found(id))
    }

    fn remove_all(&self) -> Result<(), RepositoryError> {
        self.state.lock().expect("vehicles mutex poisoned").1.clear();
        Ok(())
    }

    fn change_capacity(&self, id: VehicleId, capacity: i32) -> Result<Vehicle, RepositoryError> {
        let mut state = self.state.lock().expect("vehicles mutex poisoned");
        let vehicle = state
            .1
            .remove(&id)
            .ok_or_else(|| RepositoryError::vehicle_not_found(id))?
            .with_capacity(capacity);
        state.1.insert(id, vehicle.clone());
        Ok(vehicle)
    }
}

#[derive(Default)]
pub struct Planner {
    events: Mutex<Vec<PlannerNotification>>,
}

impl Planner {
    pub fn events(&self) -> Vec<PlannerNotification> {
        self.events.lock().expect("planner mutex poisoned").clone()
    }

    fn push(&self, notification: PlannerNotification) -> Result<(), PlannerError> {
        self.events
            .lock()
            .expect("planner mutex poisoned")
            .push(notification);
        Ok(())
    }
}

impl VehiclePlanner for Planner {
    fn add_vehicle(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.push(PlannerNotification::AddVehicle(vehicle.clone()))
    }

    fn remove_vehicle(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.push(PlannerNotification::RemoveVehicle(vehicle.clone()))
    }

    fn remove_all_vehicles(&self) -> Result<(), PlannerError> {
        self.push(PlannerNotification::RemoveAllVehicles)
    }

    fn change_capacity(&self, vehicle: &Vehicle) -> Result<(), PlannerError> {
        self.push(PlannerNotification::ChangeCapacity(vehicle.clone()))
    }
}
