use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::repository::{
    PlannerDivergence, PlannerNotification, VehiclePlanner, VehicleRepository,
};
use crate::config::FleetConfig;
use crate::domain::{ValidationError, Vehicle, VehicleAttributes, VehicleId};
use crate::portable::NewVehicle;
use crate::repository::RepositoryError;

/// Keeps the vehicle repository and the route planner consistent.
///
/// Every mutation commits to the repository first and tells the planner
/// second. A planner failure does not undo the commit: it is logged and kept
/// as a [`PlannerDivergence`] until [`VehicleService::reconcile`] delivers it.
pub struct VehicleService<R, P> {
    repository: Arc<R>,
    planner: Arc<P>,
    default_capacity: i32,
    default_skill_set: BTreeSet<String>,
    remove_any_guard: Mutex<()>,
    divergences: Mutex<Vec<PlannerDivergence>>,
}

impl<R, P> VehicleService<R, P>
where
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    pub fn new(repository: Arc<R>, planner: Arc<P>, fleet: &FleetConfig) -> Self {
        Self {
            repository,
            planner,
            default_capacity: fleet.default_capacity,
            default_skill_set: fleet.default_skill_set(),
            remove_any_guard: Mutex::new(()),
            divergences: Mutex::new(Vec::new()),
        }
    }

    pub fn default_capacity(&self) -> i32 {
        self.default_capacity
    }

    /// Create a vehicle with the fleet's default capacity and skills.
    pub fn create_vehicle(&self) -> Result<Vehicle, VehicleServiceError> {
        let vehicle = self
            .repository
            .create_unnamed_vehicle(self.default_capacity, self.default_skill_set.clone())?;
        info!(vehicle_id = %vehicle.id(), capacity = vehicle.capacity(), "vehicle created");
        self.notify(PlannerNotification::AddVehicle(vehicle.clone()));
        Ok(vehicle)
    }

    pub fn create_vehicle_with(
        &self,
        attributes: VehicleAttributes,
    ) -> Result<Vehicle, VehicleServiceError> {
        let vehicle = self.repository.create_vehicle(attributes)?;
        info!(vehicle_id = %vehicle.id(), name = vehicle.name(), "vehicle created");
        self.notify(PlannerNotification::AddVehicle(vehicle.clone()));
        Ok(vehicle)
    }

    /// Validate a loosely typed request, then create the vehicle. Nothing
    /// reaches the repository when validation fails.
    pub fn create_vehicle_from(&self, request: NewVehicle) -> Result<Vehicle, VehicleServiceError> {
        let attributes = request.into_attributes(self.default_capacity)?;
        self.create_vehicle_with(attributes)
    }

    pub fn vehicles(&self) -> Result<Vec<Vehicle>, VehicleServiceError> {
        Ok(self.repository.vehicles()?)
    }

    pub fn vehicle(&self, id: VehicleId) -> Result<Vehicle, VehicleServiceError> {
        self.repository
            .find(id)?
            .ok_or_else(|| RepositoryError::vehicle_not_found(id).into())
    }

    pub fn remove_vehicle(&self, id: VehicleId) -> Result<Vehicle, VehicleServiceError> {
        let vehicle = self.repository.remove_vehicle(id)?;
        info!(vehicle_id = %id, "vehicle removed");
        self.notify(PlannerNotification::RemoveVehicle(vehicle.clone()));
        Ok(vehicle)
    }

    /// Remove the vehicle with the smallest id. An empty fleet is not an error.
    ///
    /// Selection and removal run under one lock, so concurrent callers never
    /// pick the same vehicle.
    pub fn remove_any_vehicle(&self) -> Result<Option<Vehicle>, VehicleServiceError> {
        let _guard = self
            .remove_any_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let smallest = self.repository.vehicles()?.iter().map(Vehicle::id).min();
        match smallest {
            Some(id) => self.remove_vehicle(id).map(Some),
            None => {
                debug!("fleet is empty, nothing to remove");
                Ok(None)
            }
        }
    }

    /// Clear the fleet. The planner is told first so it stops referencing ids
    /// that are about to disappear.
    pub fn remove_all(&self) -> Result<(), VehicleServiceError> {
        self.notify(PlannerNotification::RemoveAllVehicles);
        self.repository.remove_all()?;
        info!("all vehicles removed");
        Ok(())
    }

    /// Capacity is stored as given; range checks belong to callers.
    pub fn change_capacity(
        &self,
        id: VehicleId,
        capacity: i32,
    ) -> Result<Vehicle, VehicleServiceError> {
        let vehicle = self.repository.change_capacity(id, capacity)?;
        info!(vehicle_id = %id, capacity, "vehicle capacity changed");
        self.notify(PlannerNotification::ChangeCapacity(vehicle.clone()));
        Ok(vehicle)
    }

    /// Planner updates that failed and have not been redelivered yet, oldest first.
    pub fn divergences(&self) -> Vec<PlannerDivergence> {
        self.ledger().clone()
    }

    /// Replay undelivered planner updates in their original order.
    ///
    /// Vehicle updates are rebuilt from the current repository row first, so
    /// the planner receives today's state; updates for vehicles that no longer
    /// exist are dropped. Updates that fail again stay in the ledger. Returns
    /// how many were delivered.
    pub fn reconcile(&self) -> usize {
        let pending = std::mem::take(&mut *self.ledger());
        if pending.is_empty() {
            return 0;
        }

        let mut delivered = 0;
        let mut dropped = 0;
        let mut still_failing = Vec::new();
        for divergence in pending {
            let notification = match self.refresh(&divergence.notification) {
                Ok(Some(notification)) => notification,
                Ok(None) => {
                    debug!(notification = %divergence.notification, "vehicle gone, update dropped");
                    dropped += 1;
                    continue;
                }
                Err(error) => {
                    warn!(notification = %divergence.notification, %error, "can't refresh pending update");
                    still_failing.push(divergence);
                    continue;
                }
            };

            match notification.deliver(self.planner.as_ref()) {
                Ok(()) => {
                    supersede(&mut still_failing, &notification);
                    delivered += 1;
                }
                Err(error) => {
                    warn!(%notification, %error, "planner still rejecting update");
                    supersede(&mut still_failing, &notification);
                    still_failing.push(PlannerDivergence::new(notification, error));
                }
            }
        }

        // updates recorded while replaying are newer than anything replayed
        let mut ledger = self.ledger();
        for divergence in std::mem::take(&mut *ledger) {
            supersede(&mut still_failing, &divergence.notification);
            still_failing.push(divergence);
        }
        *ledger = still_failing;
        info!(
            delivered,
            dropped,
            remaining = ledger.len(),
            "planner reconciliation finished"
        );
        delivered
    }

    fn notify(&self, notification: PlannerNotification) {
        let outcome = notification.deliver(self.planner.as_ref());
        let mut ledger = self.ledger();
        supersede(&mut ledger, &notification);
        if let Err(error) = outcome {
            warn!(
                %notification,
                vehicle_id = ?notification.vehicle_id(),
                %error,
                "planner notification failed, repository change kept"
            );
            ledger.push(PlannerDivergence::new(notification, error));
        }
    }

    /// The update to send now for a pending one, or `None` when the vehicle
    /// it describes has left the repository.
    fn refresh(
        &self,
        notification: &PlannerNotification,
    ) -> Result<Option<PlannerNotification>, RepositoryError> {
        Ok(match notification {
            PlannerNotification::AddVehicle(vehicle) => self
                .repository
                .find(vehicle.id())?
                .map(PlannerNotification::AddVehicle),
            PlannerNotification::ChangeCapacity(vehicle) => self
                .repository
                .find(vehicle.id())?
                .map(PlannerNotification::ChangeCapacity),
            PlannerNotification::RemoveVehicle(_) | PlannerNotification::RemoveAllVehicles => {
                Some(notification.clone())
            }
        })
    }

    fn ledger(&self) -> MutexGuard<'_, Vec<PlannerDivergence>> {
        self.divergences
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drop pending updates that `latest` makes obsolete. A removal outdates
/// everything pending for that vehicle, clearing the fleet outdates everything,
/// and only the newest capacity change of a vehicle is worth sending.
fn supersede(pending: &mut Vec<PlannerDivergence>, latest: &PlannerNotification) {
    match latest {
        PlannerNotification::RemoveAllVehicles => pending.clear(),
        PlannerNotification::RemoveVehicle(vehicle) => {
            pending.retain(|divergence| divergence.notification.vehicle_id() != Some(vehicle.id()))
        }
        PlannerNotification::ChangeCapacity(vehicle) => pending.retain(|divergence| {
            !matches!(
                &divergence.notification,
                PlannerNotification::ChangeCapacity(older) if older.id() == vehicle.id()
            )
        }),
        PlannerNotification::AddVehicle(_) => {}
    }
}

/// Error raised by the vehicle service.
#[derive(Debug, thiserror::Error)]
pub enum VehicleServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl VehicleServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_not_found())
    }
}
