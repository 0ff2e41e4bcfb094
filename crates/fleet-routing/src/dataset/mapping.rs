use super::document::{DataSet, DataSetLocation, DataSetVehicle};
use crate::domain::{
    Coordinates, CoordinatesError, LocationAttributes, RoutingProblem, VehicleAttributes,
};

pub(crate) fn to_document(problem: &RoutingProblem) -> Result<DataSet, CoordinatesError> {
    Ok(DataSet {
        name: Some(problem.name().to_string()),
        depot: problem.depot().map(location_record).transpose()?,
        vehicles: Some(problem.vehicles().iter().map(vehicle_record).collect()),
        visits: Some(
            problem
                .visits()
                .iter()
                .map(location_record)
                .collect::<Result<_, _>>()?,
        ),
    })
}

pub(crate) fn to_domain(data_set: DataSet) -> Result<RoutingProblem, CoordinatesError> {
    let DataSet {
        name,
        depot,
        vehicles,
        visits,
    } = data_set;

    let vehicles = vehicles
        .unwrap_or_default()
        .into_iter()
        .map(vehicle_attributes)
        .collect();
    let depot = depot.map(location_attributes).transpose()?;
    let visits = visits
        .unwrap_or_default()
        .into_iter()
        .map(location_attributes)
        .collect::<Result<_, _>>()?;

    Ok(RoutingProblem::new(
        name.unwrap_or_default(),
        vehicles,
        depot,
        visits,
    ))
}

fn location_record(location: &LocationAttributes) -> Result<DataSetLocation, CoordinatesError> {
    let (latitude, longitude) = location.coordinates().narrow()?;
    Ok(DataSetLocation {
        description: Some(location.description().to_string()),
        latitude,
        longitude,
        required_skill: Some(location.required_skill().to_string()),
    })
}

fn vehicle_record(vehicle: &VehicleAttributes) -> DataSetVehicle {
    DataSetVehicle {
        name: vehicle.name().to_string(),
        capacity: vehicle.capacity(),
        skill_set: Some(vehicle.skill_set().clone()),
    }
}

fn location_attributes(record: DataSetLocation) -> Result<LocationAttributes, CoordinatesError> {
    let coordinates = Coordinates::from_f64(record.latitude, record.longitude)?;
    Ok(LocationAttributes::new(
        coordinates,
        record.required_skill.unwrap_or_default(),
        record.description.unwrap_or_default(),
    ))
}

fn vehicle_attributes(record: DataSetVehicle) -> VehicleAttributes {
    VehicleAttributes::new(
        record.name,
        record.capacity,
        record.skill_set.unwrap_or_default(),
    )
}
