//! Measured dimensions of a charge detail record

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::common::TariffId;
use crate::support::enums::ocpi_enum;
use crate::support::errors::{DomainError, DomainResult};
use crate::support::serializations::to_json_object;
use crate::support::time::timestamp;

ocpi_enum!(
    /// What a CDR dimension measures.
    CdrDimensionType, "CDR dimension type" {
        Current => "CURRENT",
        Energy => "ENERGY",
        EnergyExport => "ENERGY_EXPORT",
        EnergyImport => "ENERGY_IMPORT",
        MaxCurrent => "MAX_CURRENT",
        MinCurrent => "MIN_CURRENT",
        MaxPower => "MAX_POWER",
        MinPower => "MIN_POWER",
        ParkingTime => "PARKING_TIME",
        Power => "POWER",
        ReservationTime => "RESERVATION_TIME",
        StateOfCharge => "STATE_OF_CHARGE",
        Time => "TIME",
    }
);

impl CdrDimensionType {
    /// Unit the volume is expressed in.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Current | Self::MaxCurrent | Self::MinCurrent => "A",
            Self::Energy | Self::EnergyExport | Self::EnergyImport => "kWh",
            Self::MaxPower | Self::MinPower | Self::Power => "kW",
            Self::ParkingTime | Self::ReservationTime | Self::Time => "h",
            Self::StateOfCharge => "%",
        }
    }
}

/// One measured value of a charging period, ordered by type then volume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CdrDimension {
    #[serde(rename = "type")]
    pub dimension: CdrDimensionType,
    #[serde(with = "rust_decimal::serde::float")]
    pub volume: Decimal,
}

impl CdrDimension {
    pub fn new(dimension: CdrDimensionType, volume: Decimal) -> Self {
        Self { dimension, volume }
    }

    pub fn parse(json: &Value) -> DomainResult<Self> {
        Self::deserialize(json).map_err(|e| DomainError::invalid_format("CDR dimension", e.to_string()))
    }

    pub fn try_parse(json: &Value) -> Option<Self> {
        Self::parse(json).ok()
    }

    pub fn to_json(&self) -> Map<String, Value> {
        to_json_object(self)
    }
}

impl std::fmt::Display for CdrDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.dimension, self.volume.normalize(), self.dimension.unit())
    }
}

/// Slice of a session during which one set of tariff rules applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargingPeriod {
    #[serde(with = "timestamp")]
    pub start_date_time: DateTime<Utc>,
    pub dimensions: Vec<CdrDimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tariff_id: Option<TariffId>,
}

impl ChargingPeriod {
    pub fn parse(json: &Value) -> DomainResult<Self> {
        let period = Self::deserialize(json).map_err(|e| DomainError::invalid_format("charging period", e.to_string()))?;
        if period.dimensions.is_empty() {
            return Err(DomainError::invalid_format(
                "charging period",
                "at least one dimension is required",
            ));
        }
        Ok(period)
    }

    pub fn to_json(&self) -> Map<String, Value> {
        to_json_object(self)
    }

    /// Volume of the first dimension of the given type.
    pub fn volume_of(&self, dimension: CdrDimensionType) -> Option<Decimal> {
        self.dimensions
            .iter()
            .find(|d| d.dimension == dimension)
            .map(|d| d.volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn parse_and_write() {
        let dimension = CdrDimension::parse(&json!({"type": "ENERGY", "volume": 12.5})).unwrap();
        assert_eq!(dimension, CdrDimension::new(CdrDimensionType::Energy, dec("12.5")));
        assert_eq!(Value::Object(dimension.to_json()), json!({"type": "ENERGY", "volume": 12.5}));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(CdrDimension::parse(&json!({"type": "VIBES", "volume": 1})).is_err());
        assert!(CdrDimension::try_parse(&json!({"type": "TIME"})).is_none());
    }

    #[test]
    fn ordered_by_type_then_volume() {
        let mut dimensions = vec![
            CdrDimension::new(CdrDimensionType::Time, dec("0.5")),
            CdrDimension::new(CdrDimensionType::Energy, dec("20")),
            CdrDimension::new(CdrDimensionType::Energy, dec("3")),
        ];
        dimensions.sort();
        assert_eq!(dimensions[0].volume, dec("3"));
        assert_eq!(dimensions[1].volume, dec("20"));
        assert_eq!(dimensions[2].dimension, CdrDimensionType::Time);
    }

    #[test]
    fn equal_volumes_compare_by_value() {
        assert_eq!(
            CdrDimension::new(CdrDimensionType::Energy, dec("1.0")),
            CdrDimension::new(CdrDimensionType::Energy, dec("1"))
        );
    }

    #[test]
    fn display_includes_unit() {
        let dimension = CdrDimension::new(CdrDimensionType::MaxPower, dec("22.00"));
        assert_eq!(dimension.to_string(), "MAX_POWER 22 kW");
    }

    #[test]
    fn charging_period_lookup() {
        let period = ChargingPeriod::parse(&json!({
            "start_date_time": "2024-03-01T10:00:00Z",
            "dimensions": [{"type": "ENERGY", "volume": 8.2}, {"type": "TIME", "volume": 0.75}],
            "tariff_id": "T-1"
        }))
        .unwrap();
        assert_eq!(period.volume_of(CdrDimensionType::Time), Some(dec("0.75")));
        assert_eq!(period.volume_of(CdrDimensionType::ParkingTime), None);
        assert_eq!(period.tariff_id.as_ref().map(|id| id.as_str()), Some("T-1"));

        assert!(ChargingPeriod::parse(&json!({
            "start_date_time": "2024-03-01T10:00:00Z",
            "dimensions": []
        }))
        .is_err());
    }
}
