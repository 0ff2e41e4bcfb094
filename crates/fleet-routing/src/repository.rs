use crate::domain::{LocationId, VehicleId};

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn vehicle_not_found(id: VehicleId) -> Self {
        Self::NotFound {
            entity: "vehicle",
            id: id.0,
        }
    }

    pub fn location_not_found(id: LocationId) -> Self {
        Self::NotFound {
            entity: "location",
            id: id.0,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
