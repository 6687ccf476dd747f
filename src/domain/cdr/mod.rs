//! Charge detail record parts

pub mod dimension;

pub use dimension::{CdrDimension, CdrDimensionType, ChargingPeriod};
