//! WGS 84 coordinates
//!
//! Written as decimal strings with a `.` separator no matter what locale the
//! producer runs in (`"51.04756"`, `"-3.72994"`).

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::support::errors::{DomainError, DomainResult};
use crate::support::serializations::{coordinate, parse_coordinate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawGeoCoordinates")]
pub struct GeoCoordinates {
    #[serde(with = "coordinate")]
    latitude: Decimal,
    #[serde(with = "coordinate")]
    longitude: Decimal,
}

#[derive(Deserialize)]
struct RawGeoCoordinates {
    #[serde(with = "coordinate")]
    latitude: Decimal,
    #[serde(with = "coordinate")]
    longitude: Decimal,
}

impl TryFrom<RawGeoCoordinates> for GeoCoordinates {
    type Error = DomainError;

    fn try_from(raw: RawGeoCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

/// Fractional digits kept, matching the wire form.
const PRECISION: u32 = 7;

impl GeoCoordinates {
    /// Both values are rounded to seven decimal places.
    pub fn new(latitude: Decimal, longitude: Decimal) -> DomainResult<Self> {
        let latitude = latitude.round_dp(PRECISION).normalize();
        let longitude = longitude.round_dp(PRECISION).normalize();
        if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
            return Err(DomainError::invalid_format(
                "latitude",
                format!("{} is outside [-90, 90]", latitude),
            ));
        }
        if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
            return Err(DomainError::invalid_format(
                "longitude",
                format!("{} is outside [-180, 180]", longitude),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse from text, accepting `,` as decimal separator.
    pub fn parse(latitude: &str, longitude: &str) -> DomainResult<Self> {
        let latitude = parse_coordinate(latitude).map_err(|e| DomainError::invalid_format("latitude", e))?;
        let longitude = parse_coordinate(longitude).map_err(|e| DomainError::invalid_format("longitude", e))?;
        Self::new(latitude, longitude)
    }

    pub fn latitude(&self) -> Decimal {
        self.latitude
    }

    pub fn longitude(&self) -> Decimal {
        self.longitude
    }
}

impl FromStr for GeoCoordinates {
    type Err = DomainError;

    /// `"<latitude> <longitude>"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(latitude), Some(longitude), None) => Self::parse(latitude, longitude),
            _ => Err(DomainError::invalid_format("coordinates", format!("'{}'", s))),
        }
    }
}
