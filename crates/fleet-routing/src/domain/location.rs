use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::Coordinates;

/// Identifier issued by a location repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub u64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything known about a place except its identity.
///
/// An empty `required_skill` means no vehicle capability is needed to serve it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationAttributes {
    coordinates: Coordinates,
    required_skill: String,
    description: String,
}

impl LocationAttributes {
    pub fn new(
        coordinates: Coordinates,
        required_skill: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            coordinates,
            required_skill: required_skill.into(),
            description: description.into(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn required_skill(&self) -> &str {
        &self.required_skill
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for LocationAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.coordinates)
        } else {
            f.write_str(&self.description)
        }
    }
}

/// A location significant to the user.
///
/// Two locations are equal when their ids are equal, whatever their attributes
/// say. Locations key sets and maps across the system, so a location keeps its
/// slot after its description or skill changes.
#[derive(Debug, Clone)]
pub struct Location {
    id: LocationId,
    attributes: LocationAttributes,
}

impl Location {
    pub fn new(id: LocationId, attributes: LocationAttributes) -> Self {
        Self { id, attributes }
    }

    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn attributes(&self) -> &LocationAttributes {
        &self.attributes
    }

    pub fn coordinates(&self) -> Coordinates {
        self.attributes.coordinates
    }

    pub fn required_skill(&self) -> &str {
        self.attributes.required_skill()
    }

    pub fn description(&self) -> &str {
        self.attributes.description()
    }

    /// `[id]: description`, falling back to the coordinates when undescribed.
    pub fn full_description(&self) -> String {
        format!("[{}]: {}", self.id, self.attributes)
    }

    pub fn into_attributes(self) -> LocationAttributes {
        self.attributes
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description().is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}: '{}'", self.id, self.description())
        }
    }
}
