//! OCPI protocol version
//!
//! Defines the protocol versions whose object model these bindings cover.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::support::errors::{DomainError, DomainResult};

/// Supported OCPI protocol versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OcpiVersion {
    /// OCPI 2.1.1
    V2_1_1,
    /// OCPI 2.2
    V2_2,
    /// OCPI 2.2.1
    V2_2_1,
    /// OCPI 2.3.0
    V2_3_0,
    /// OCPI 3.0
    V3_0,
}

impl OcpiVersion {
    /// All supported OCPI versions, ordered from newest to oldest.
    pub const ALL: &'static [OcpiVersion] = &[
        Self::V3_0,
        Self::V2_3_0,
        Self::V2_2_1,
        Self::V2_2,
        Self::V2_1_1,
    ];

    /// Version string as exchanged in the `versions` module.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2_1_1 => "2.1.1",
            Self::V2_2 => "2.2",
            Self::V2_2_1 => "2.2.1",
            Self::V2_3_0 => "2.3.0",
            Self::V3_0 => "3.0",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| DomainError::invalid_format("OCPI version", format!("unsupported '{}'", s)))
    }

    /// Highest version both sides support, if any.
    pub fn negotiate(ours: &[OcpiVersion], theirs: &[OcpiVersion]) -> Option<OcpiVersion> {
        ours.iter().filter(|v| theirs.contains(v)).max().copied()
    }
}

impl fmt::Display for OcpiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OCPI {}", self.as_str())
    }
}

impl std::str::FromStr for OcpiVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for OcpiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OcpiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
