use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Horizontal position on the Earth held at full decimal precision.
///
/// Equality is numeric: `50.10` and `50.1` are the same latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    latitude: Decimal,
    longitude: Decimal,
}

/// Raised when a floating value cannot cross into (or out of) the decimal model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinatesError {
    #[error("coordinate {0} is not a finite number")]
    NotFinite(f64),
    #[error("coordinate {value} is outside the supported decimal range")]
    OutOfRange { value: String },
    #[error("coordinate {value} has no floating point representation")]
    Unrepresentable { value: String },
}

impl Coordinates {
    pub const fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Widen a floating point pair, keeping the shortest decimal that prints
    /// the same float (`0.1_f64` becomes `0.1`, not its binary expansion).
    pub fn from_f64(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        Ok(Self {
            latitude: widen(latitude)?,
            longitude: widen(longitude)?,
        })
    }

    pub const fn latitude(&self) -> Decimal {
        self.latitude
    }

    pub const fn longitude(&self) -> Decimal {
        self.longitude
    }

    /// Narrow both components to the nearest `f64`. Precision past what a
    /// double can hold is dropped.
    pub fn narrow(&self) -> Result<(f64, f64), CoordinatesError> {
        Ok((narrow(self.latitude)?, narrow(self.longitude)?))
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.latitude, self.longitude)
    }
}

fn widen(value: f64) -> Result<Decimal, CoordinatesError> {
    if !value.is_finite() {
        return Err(CoordinatesError::NotFinite(value));
    }
    let plain = value.to_string();
    Decimal::from_str(&plain).map_err(|_| CoordinatesError::OutOfRange { value: plain })
}

fn narrow(value: Decimal) -> Result<f64, CoordinatesError> {
    let plain = value.to_string();
    plain
        .parse::<f64>()
        .map_err(|_| CoordinatesError::Unrepresentable { value: plain })
}
