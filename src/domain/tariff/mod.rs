//! Tariff aggregate
//!
//! Price components, the restrictions that gate them, and the tariff entity.

pub mod model;
pub mod price_component;
pub mod restrictions;

pub use model::{Tariff, TariffElement, TariffType};
pub use price_component::{PriceComponent, TariffDimensionType};
pub use restrictions::{DayOfWeek, ReservationRestrictionType, TariffRestrictions};
