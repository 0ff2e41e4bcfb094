use super::{LocationAttributes, VehicleAttributes};

/// Snapshot of a routing problem: who drives, where routes start, and what
/// must be visited. The depot is never part of `visits`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingProblem {
    name: String,
    vehicles: Vec<VehicleAttributes>,
    depot: Option<LocationAttributes>,
    visits: Vec<LocationAttributes>,
}

impl RoutingProblem {
    pub fn new(
        name: impl Into<String>,
        vehicles: Vec<VehicleAttributes>,
        depot: Option<LocationAttributes>,
        visits: Vec<LocationAttributes>,
    ) -> Self {
        Self {
            name: name.into(),
            vehicles,
            depot,
            visits,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vehicles(&self) -> &[VehicleAttributes] {
        &self.vehicles
    }

    pub fn depot(&self) -> Option<&LocationAttributes> {
        self.depot.as_ref()
    }

    pub fn visits(&self) -> &[LocationAttributes] {
        &self.visits
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty() && self.depot.is_none() && self.visits.is_empty()
    }

    /// Depot first, then visits, in the order a planner registers them.
    pub fn locations(&self) -> impl Iterator<Item = &LocationAttributes> {
        self.depot.iter().chain(self.visits.iter())
    }
}
