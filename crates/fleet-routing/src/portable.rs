//! JSON shapes exchanged with HTTP clients. Nothing here is persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Location, ValidationError, Vehicle, VehicleAttributes};

/// [`Location`] representation convenient for marshalling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableLocation {
    pub id: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub lat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub lng: Decimal,
    pub required_skill: String,
    pub description: String,
}

impl From<&Location> for PortableLocation {
    fn from(location: &Location) -> Self {
        let coordinates = location.coordinates();
        Self {
            id: location.id().0,
            lat: coordinates.latitude(),
            lng: coordinates.longitude(),
            required_skill: location.required_skill().to_string(),
            description: location.description().to_string(),
        }
    }
}

/// [`Vehicle`] representation suitable for network transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableVehicle {
    pub id: u64,
    pub name: String,
    pub skill_set: Vec<String>,
    pub capacity: i32,
}

impl From<&Vehicle> for PortableVehicle {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id().0,
            name: vehicle.name().to_string(),
            skill_set: vehicle.skill_set().iter().cloned().collect(),
            capacity: vehicle.capacity(),
        }
    }
}

/// Body of a location creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    #[serde(with = "rust_decimal::serde::float")]
    pub lat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub lng: Decimal,
    #[serde(default)]
    pub required_skill: String,
    #[serde(default)]
    pub description: String,
}

/// Body of a custom vehicle request. Capacity falls back to the fleet default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub skill_set: Vec<String>,
}

impl NewVehicle {
    pub fn into_attributes(self, default_capacity: i32) -> Result<VehicleAttributes, ValidationError> {
        VehicleAttributes::try_new(
            self.name,
            self.capacity.unwrap_or(default_capacity),
            self.skill_set,
        )
    }
}

/// Body of a capacity change request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapacityChange {
    pub capacity: i32,
}
