//! YAML datasets describing whole routing problems.
//!
//! Coordinates are narrowed to `f64` on the way out, so a dataset round trip
//! preserves a problem only up to double precision.

mod document;
mod mapping;
mod seed;

use crate::domain::{CoordinatesError, RoutingProblem};
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub use seed::{export_problem, replace_problem, seed_problem, SeedError, SeedSummary};

/// The dataset could not be turned into a routing problem.
#[derive(Debug, Error)]
pub enum DatasetReadError {
    #[error("can't read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("dataset contains unusable coordinates: {0}")]
    Coordinates(#[from] CoordinatesError),
}

/// A routing problem could not be written as a dataset.
#[derive(Debug, Error)]
pub enum DatasetWriteError {
    #[error("failed to marshal dataset ({name}): {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to marshal dataset ({name}): {source}")]
    Coordinates {
        name: String,
        #[source]
        source: CoordinatesError,
    },
}

/// Converts routing problems to and from the YAML dataset format.
///
/// No validation happens beyond type coercion; a negative capacity in a
/// dataset reaches the domain unchanged.
pub struct DatasetMarshaller;

impl DatasetMarshaller {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RoutingProblem, DatasetReadError> {
        let file = std::fs::File::open(path)?;
        Self::unmarshal(file)
    }

    pub fn unmarshal<R: Read>(reader: R) -> Result<RoutingProblem, DatasetReadError> {
        let data_set: document::DataSet = serde_yaml::from_reader(reader)?;
        let problem = mapping::to_domain(data_set)?;
        debug!(
            name = problem.name(),
            vehicles = problem.vehicles().len(),
            visits = problem.visits().len(),
            depot = problem.depot().is_some(),
            "dataset unmarshalled"
        );
        Ok(problem)
    }

    pub fn unmarshal_str(text: &str) -> Result<RoutingProblem, DatasetReadError> {
        Self::unmarshal(text.as_bytes())
    }

    pub fn marshal(problem: &RoutingProblem) -> Result<String, DatasetWriteError> {
        let data_set =
            mapping::to_document(problem).map_err(|source| DatasetWriteError::Coordinates {
                name: problem.name().to_string(),
                source,
            })?;
        serde_yaml::to_string(&data_set).map_err(|source| DatasetWriteError::Serialize {
            name: problem.name().to_string(),
            source,
        })
    }
}
