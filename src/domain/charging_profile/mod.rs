//! Charging profiles

pub mod model;

pub use model::{ActiveChargingProfile, ChargingProfile, ChargingProfilePeriod, ChargingRateUnit};
