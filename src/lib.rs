//! # OCPI bindings
//!
//! Typed OCPI (2.1.1 – 3.0) objects with JSON parsing, deterministic
//! serialization, content ETags and JSON merge-patch.
//!
//! ## Layout
//!
//! - **domain**: identifiers, code tables, value records and the
//!   charging station / tariff aggregates
//! - **support**: errors, wire helpers, hashing and the merge-patch engine
//! - **config**: TOML settings
//! - **telemetry**: tracing subscriber setup
//!
//! ```ignore
//! use ocpi_bindings::{ChargingStation, Patchable};
//!
//! let station = ChargingStation::parse(&body, Some(&route_id))?;
//! let patched = station.apply_merge_patch(patch, false)?;
//! response.header("ETag", patched.etag());
//! ```

pub mod config;
pub mod domain;
pub mod support;
pub mod telemetry;

pub use config::{default_config_path, AppConfig, LoggingConfig, PatchConfig};
pub use domain::common::{
    Capability, ChargingStationId, ConnectorFormat, ConnectorId, ConnectorType, CountryCode, DisplayText, EnergyMeter,
    EnergyMeterId, EvseStatus, EvseUid, GeoCoordinates, Image, ImageCategory, Language, LocationId, PartyId, PowerType,
    Price, TariffId, TokenType,
};
pub use domain::{
    patch_object, ActiveChargingProfile, CdrDimension, CdrDimensionType, ChargingPeriod, ChargingProfile,
    ChargingProfilePeriod, ChargingRateUnit, ChargingStation, ChargingStationBuilder, Connector, DomainError,
    DomainResult, Evse, EvseRef, OcpiVersion, PatchResult, Patchable, PriceComponent, SharedChargingStation, Tariff,
    TariffDimensionType, TariffElement, TariffRestrictions, TariffType,
};
pub use support::errors::{AppError, InfraError};
pub use telemetry::init_tracing;
