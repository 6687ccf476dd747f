//! OCPI object model

pub mod cdr;
pub mod charging_profile;
pub mod charging_station;
pub mod common;
pub mod ocpi;
pub mod patch;
pub mod tariff;

pub use cdr::{CdrDimension, CdrDimensionType, ChargingPeriod};
pub use charging_profile::{ActiveChargingProfile, ChargingProfile, ChargingProfilePeriod, ChargingRateUnit};
pub use charging_station::{
    ChargingStation, ChargingStationBuilder, Connector, Evse, EvseRef, SharedChargingStation,
};
pub use ocpi::OcpiVersion;
pub use patch::{patch_object, PatchResult, Patchable};
pub use tariff::{PriceComponent, Tariff, TariffDimensionType, TariffElement, TariffRestrictions, TariffType};

pub use crate::support::errors::{DomainError, DomainResult};
