//! Identifiers, code tables and small records shared by the OCPI modules

pub mod display_text;
pub mod energy_meter;
pub mod enums;
pub mod geo_coordinates;
pub mod identifiers;
pub mod image;
pub mod price;

pub use display_text::DisplayText;
pub use energy_meter::EnergyMeter;
pub use enums::{
    Capability, ConnectorFormat, ConnectorType, EvseStatus, ImageCategory, Language, PowerType,
    TokenType,
};
pub use geo_coordinates::GeoCoordinates;
pub use identifiers::{
    ChargingStationId, ConnectorId, CountryCode, EnergyMeterId, EvseUid, LocationId, PartyId,
    TariffId,
};
pub use image::Image;
pub use price::Price;
