//! Price component of a tariff element

use std::cmp::Ordering;
use std::time::Duration;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::support::enums::ocpi_enum;
use crate::support::errors::{DomainError, DomainResult};
use crate::support::serializations::to_json_object;

ocpi_enum!(
    /// Dimension a price component is billed on.
    TariffDimensionType, "tariff dimension type" {
        Energy => "ENERGY",
        Flat => "FLAT",
        ParkingTime => "PARKING_TIME",
        Time => "TIME",
    }
);

/// One priced dimension of a tariff element.
///
/// `step_size` is in Wh for `ENERGY` and in seconds for `TIME` and
/// `PARKING_TIME`; `FLAT` components always use 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceComponent {
    #[serde(rename = "type")]
    pub dimension: TariffDimensionType,
    /// Price per unit (excl. VAT).
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// VAT percentage, absent when unknown.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub vat: Option<Decimal>,
    pub step_size: u32,
}

impl PriceComponent {
    pub fn new(dimension: TariffDimensionType, price: Decimal, vat: Option<Decimal>, step_size: u32) -> Self {
        Self {
            dimension,
            price,
            vat,
            step_size,
        }
    }

    pub fn flat(price: Decimal, vat: Option<Decimal>) -> Self {
        Self::new(TariffDimensionType::Flat, price, vat, 1)
    }

    /// `step_size` in Wh.
    pub fn energy(price: Decimal, vat: Option<Decimal>, step_size: u32) -> Self {
        Self::new(TariffDimensionType::Energy, price, vat, step_size)
    }

    /// Price per hour of charging, billed in steps of `step`.
    pub fn charging_time(price: Decimal, vat: Option<Decimal>, step: Duration) -> Self {
        Self::new(TariffDimensionType::Time, price, vat, whole_seconds(step))
    }

    /// Price per hour of parking, billed in steps of `step`.
    pub fn parking_time(price: Decimal, vat: Option<Decimal>, step: Duration) -> Self {
        Self::new(TariffDimensionType::ParkingTime, price, vat, whole_seconds(step))
    }

    pub fn parse(json: &Value) -> DomainResult<Self> {
        Self::deserialize(json).map_err(|e| DomainError::invalid_format("price component", e.to_string()))
    }

    pub fn try_parse(json: &Value) -> Option<Self> {
        Self::parse(json).ok()
    }

    pub fn to_json(&self) -> Map<String, Value> {
        to_json_object(self)
    }
}

/// Round to whole seconds, half away from zero, saturating at `u32::MAX`.
fn whole_seconds(step: Duration) -> u32 {
    let millis = i64::try_from(step.as_millis()).unwrap_or(i64::MAX);
    Decimal::new(millis, 3)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(u32::MAX)
}

impl PartialOrd for PriceComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dimension, then price, then step size, then VAT (absent sorts first).
impl Ord for PriceComponent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dimension
            .cmp(&other.dimension)
            .then_with(|| self.price.cmp(&other.price))
            .then_with(|| self.step_size.cmp(&other.step_size))
            .then_with(|| self.vat.cmp(&other.vat))
    }
}
