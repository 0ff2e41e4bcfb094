use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Identifier issued by a vehicle repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected vehicle attributes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("vehicle name is required")]
    MissingName,
}

/// Name, capacity, and skills of a vehicle, without identity.
///
/// The skill set is collected into storage owned by this value, so handing a
/// collection over never leaves the caller holding a live alias to it.
/// Capacity is not range checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VehicleAttributes {
    name: String,
    capacity: i32,
    skill_set: BTreeSet<String>,
}

impl VehicleAttributes {
    pub fn new<I, S>(name: impl Into<String>, capacity: i32, skill_set: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            capacity,
            skill_set: skill_set.into_iter().map(Into::into).collect(),
        }
    }

    /// Build attributes from loosely typed input where the name may be absent.
    pub fn try_new<I, S>(
        name: Option<String>,
        capacity: i32,
        skill_set: I,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.ok_or(ValidationError::MissingName)?;
        Ok(Self::new(name, capacity, skill_set))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    pub fn skill_set(&self) -> &BTreeSet<String> {
        &self.skill_set
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skill_set.contains(skill)
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }
}

impl fmt::Display for VehicleAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            return f.write_str("<noname>");
        }
        let skills: Vec<&str> = self.skill_set.iter().map(String::as_str).collect();
        write!(f, "'{}' [{}]", self.name, skills.join(", "))
    }
}

/// A vehicle in the fleet. Equality and hashing look at the id only.
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    attributes: VehicleAttributes,
}

impl Vehicle {
    pub fn new(id: VehicleId, attributes: VehicleAttributes) -> Self {
        Self { id, attributes }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn attributes(&self) -> &VehicleAttributes {
        &self.attributes
    }

    pub fn name(&self) -> &str {
        self.attributes.name()
    }

    pub fn capacity(&self) -> i32 {
        self.attributes.capacity()
    }

    pub fn skill_set(&self) -> &BTreeSet<String> {
        self.attributes.skill_set()
    }

    /// Same vehicle (same id) carrying a new capacity.
    pub fn with_capacity(self, capacity: i32) -> Self {
        Self {
            id: self.id,
            attributes: self.attributes.with_capacity(capacity),
        }
    }

    pub fn into_attributes(self) -> VehicleAttributes {
        self.attributes
    }
}

impl PartialEq for Vehicle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vehicle {}

impl Hash for Vehicle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.attributes)
    }
}
