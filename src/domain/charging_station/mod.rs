//! Charging station aggregate
//!
//! [`ChargingStation`] owns its [`Evse`]s, which own their [`Connector`]s.
//! Children carry no pointer back to their parent; iterate a station's
//! EVSEs through [`EvseRef`] to keep the parent at hand.

pub mod builder;
pub mod connector;
pub mod evse;
pub mod model;
pub mod shared;

pub use builder::ChargingStationBuilder;
pub use connector::Connector;
pub use evse::Evse;
pub use model::{ChargingStation, EvseRef};
pub use shared::SharedChargingStation;
