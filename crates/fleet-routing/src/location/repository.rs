use crate::domain::{Coordinates, Location, LocationId};
use crate::repository::RepositoryError;

/// Storage abstraction for locations. Implementations issue ids and must never
/// reuse one within a run.
pub trait LocationRepository: Send + Sync {
    /// Create a location with a fresh unique id.
    fn create_location(
        &self,
        coordinates: Coordinates,
        required_skill: &str,
        description: &str,
    ) -> Result<Location, RepositoryError>;

    /// All locations. The order is stable for the returned snapshot only.
    fn locations(&self) -> Result<Vec<Location>, RepositoryError>;

    /// Remove a location, returning it. Fails with `NotFound` for unknown ids.
    fn remove_location(&self, id: LocationId) -> Result<Location, RepositoryError>;

    /// Remove every location. Calling it on an empty repository is fine.
    fn remove_all(&self) -> Result<(), RepositoryError>;

    fn find(&self, id: LocationId) -> Result<Option<Location>, RepositoryError>;
}
