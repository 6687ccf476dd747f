//! Smart-charging profiles as exchanged over the OCPI ChargingProfiles module

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::support::enums::ocpi_enum;
use crate::support::errors::{DomainError, DomainResult};
use crate::support::serializations::to_json_object;
use crate::support::time::{timestamp, timestamp_option};

ocpi_enum!(
    ChargingRateUnit, "charging rate unit" {
        Watts => "W",
        Amperes => "A",
    }
);

/// Limit in force from `start_period` seconds after the profile start.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChargingProfilePeriod {
    pub start_period: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChargingProfile {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp_option")]
    pub start_date_time: Option<DateTime<Utc>>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub charging_rate_unit: ChargingRateUnit,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub min_charging_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charging_profile_period: Vec<ChargingProfilePeriod>,
}

impl ChargingProfile {
    pub fn new(charging_rate_unit: ChargingRateUnit, charging_profile_period: Vec<ChargingProfilePeriod>) -> Self {
        Self {
            start_date_time: None,
            duration: None,
            charging_rate_unit,
            min_charging_rate: None,
            charging_profile_period,
        }
    }

    pub fn parse(json: &Value) -> DomainResult<Self> {
        let profile = Self::deserialize(json).map_err(|e| DomainError::invalid_format("charging profile", e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn try_parse(json: &Value) -> Option<Self> {
        Self::parse(json).ok()
    }

    pub fn to_json(&self) -> Map<String, Value> {
        to_json_object(self)
    }

    fn validate(&self) -> DomainResult<()> {
        let ascending = self
            .charging_profile_period
            .windows(2)
            .all(|pair| pair[0].start_period < pair[1].start_period);
        if !ascending {
            return Err(DomainError::invalid_format(
                "charging profile",
                "charging_profile_period must be ordered by start_period",
            ));
        }
        Ok(())
    }

    /// Limit in force `offset` seconds into the profile, if any.
    pub fn limit_after(&self, offset: u32) -> Option<Decimal> {
        if self.duration.is_some_and(|duration| offset >= duration) {
            return None;
        }
        self.charging_profile_period
            .iter()
            .take_while(|period| period.start_period <= offset)
            .last()
            .map(|period| period.limit)
    }
}

/// Profile currently in effect at a session, as reported by the charge point operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActiveChargingProfile {
    #[serde(with = "timestamp")]
    pub start_date_time: DateTime<Utc>,
    pub charging_profile: ChargingProfile,
}

impl ActiveChargingProfile {
    pub fn new(start_date_time: DateTime<Utc>, charging_profile: ChargingProfile) -> Self {
        Self {
            start_date_time,
            charging_profile,
        }
    }

    pub fn parse(json: &Value) -> DomainResult<Self> {
        let active =
            Self::deserialize(json).map_err(|e| DomainError::invalid_format("active charging profile", e.to_string()))?;
        active.charging_profile.validate()?;
        Ok(active)
    }

    pub fn try_parse(json: &Value) -> Option<Self> {
        Self::parse(json).ok()
    }

    pub fn to_json(&self) -> Map<String, Value> {
        to_json_object(self)
    }

    /// Limit in force at `at`; `None` before the start or once the profile ran out.
    pub fn limit_at(&self, at: DateTime<Utc>) -> Option<Decimal> {
        let elapsed = at.signed_duration_since(self.start_date_time);
        if elapsed < Duration::zero() {
            return None;
        }
        let offset = u32::try_from(elapsed.num_seconds()).unwrap_or(u32::MAX);
        self.charging_profile.limit_after(offset)
    }
}
