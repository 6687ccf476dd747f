//! OCPI identifiers
//!
//! All identifiers are case-insensitive (`CiString` in OCPI terms). Length
//! limits follow the OCPI object definitions.

use uuid::Uuid;

use crate::support::id::{ocpi_identifier, random_alphanumeric};

fn country_code_rule(text: &str) -> Result<(), String> {
    if text.len() == 2 && text.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(format!("'{}' is not an ISO 3166-1 alpha-2 code", text))
    }
}

fn party_id_rule(text: &str) -> Result<(), String> {
    if text.len() == 3 && text.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(format!("'{}' is not a 3 character party id", text))
    }
}

ocpi_identifier!(
    /// ISO 3166-1 alpha-2 country code of the owning party.
    CountryCode,
    "country code",
    rule = country_code_rule
);

ocpi_identifier!(
    /// ISO 15118 party identifier (3 characters).
    PartyId,
    "party id",
    rule = party_id_rule
);

ocpi_identifier!(LocationId, "location id", max_len = 36);

ocpi_identifier!(
    /// Identifier of a charging station, unique within the owning party.
    ChargingStationId,
    "charging station id",
    max_len = 36
);

ocpi_identifier!(
    /// Technical identifier of an EVSE (`uid`), not the eMI3 EVSE ID.
    EvseUid,
    "EVSE uid",
    max_len = 36
);

ocpi_identifier!(ConnectorId, "connector id", max_len = 36);

ocpi_identifier!(TariffId, "tariff id", max_len = 36);

ocpi_identifier!(EnergyMeterId, "energy meter id", max_len = 255);

impl LocationId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl ChargingStationId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl EvseUid {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl TariffId {
    pub fn new_random() -> Self {
        Self(random_alphanumeric(16))
    }
}

impl EnergyMeterId {
    pub fn new_random() -> Self {
        Self(random_alphanumeric(30))
    }
}
