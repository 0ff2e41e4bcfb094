use tracing::info;

use crate::domain::RoutingProblem;
use crate::location::LocationRepository;
use crate::repository::RepositoryError;
use crate::vehicle::{VehiclePlanner, VehicleRepository, VehicleService, VehicleServiceError};

/// How much of a problem was loaded into the live fleet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub locations: usize,
    pub vehicles: usize,
}

/// Seeding stopped part way; whatever was created before the failure stays.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Vehicle(#[from] VehicleServiceError),
}

/// Add a problem's locations and vehicles to the live fleet.
///
/// The depot is created before the visits so it receives the smallest
/// location id, which is how [`export_problem`] recognises it again.
/// Vehicles go through the service so the planner hears about each one.
pub fn seed_problem<L, R, P>(
    problem: &RoutingProblem,
    locations: &L,
    vehicles: &VehicleService<R, P>,
) -> Result<SeedSummary, SeedError>
where
    L: LocationRepository + ?Sized,
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    let mut summary = SeedSummary::default();

    for location in problem.locations() {
        locations.create_location(
            location.coordinates(),
            location.required_skill(),
            location.description(),
        )?;
        summary.locations += 1;
    }

    for attributes in problem.vehicles() {
        vehicles.create_vehicle_with(attributes.clone())?;
        summary.vehicles += 1;
    }

    info!(
        problem = problem.name(),
        locations = summary.locations,
        vehicles = summary.vehicles,
        "routing problem seeded"
    );
    Ok(summary)
}

/// Clear the fleet, then seed it with `problem`.
pub fn replace_problem<L, R, P>(
    problem: &RoutingProblem,
    locations: &L,
    vehicles: &VehicleService<R, P>,
) -> Result<SeedSummary, SeedError>
where
    L: LocationRepository + ?Sized,
    R: VehicleRepository + 'static,
    P: VehiclePlanner + 'static,
{
    vehicles.remove_all()?;
    locations.remove_all()?;
    seed_problem(problem, locations, vehicles)
}

/// Snapshot the live fleet as a routing problem: the location with the
/// smallest id is the depot, the others are visits, everything ordered by id.
pub fn export_problem<L, V>(
    name: &str,
    locations: &L,
    vehicles: &V,
) -> Result<RoutingProblem, RepositoryError>
where
    L: LocationRepository + ?Sized,
    V: VehicleRepository + ?Sized,
{
    let mut stored_locations = locations.locations()?;
    stored_locations.sort_by_key(|location| location.id());
    let mut stored_vehicles = vehicles.vehicles()?;
    stored_vehicles.sort_by_key(|vehicle| vehicle.id());

    let mut places = stored_locations
        .into_iter()
        .map(|location| location.into_attributes());
    let depot = places.next();
    let visits = places.collect();

    Ok(RoutingProblem::new(
        name,
        stored_vehicles
            .into_iter()
            .map(|vehicle| vehicle.into_attributes())
            .collect(),
        depot,
        visits,
    ))
}
