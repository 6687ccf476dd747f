//! Charging station aggregate

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::builder::ChargingStationBuilder;
use super::evse::Evse;
use crate::domain::common::{Capability, ChargingStationId, DisplayText, EnergyMeter, EvseUid, GeoCoordinates, Image};
use crate::domain::patch::Patchable;
use crate::support::errors::{DomainError, DomainResult};
use crate::support::id::resolve_identifier;
use crate::support::serializations::{map_values, to_json_object};
use crate::support::time::{timestamp, timestamp_option};

pub(super) const ENTITY: &str = "charging station";

/// A charging station with its EVSEs.
///
/// Values are immutable: every change (`with_evse`, `apply_merge_patch`,
/// the builder) produces a new station with a freshly computed ETag.
///
/// The JSON form writes the station id as `id` and the EVSE list as
/// `evses`, the OCPI 2.2 location-style names. `uid` and `evse` are read
/// as aliases and both spellings are protected from merge-patches, so
/// either producer style parses to the same station and the same ETag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargingStation {
    id: ChargingStationId,
    #[serde(serialize_with = "map_values", skip_serializing_if = "BTreeMap::is_empty")]
    evses: BTreeMap<EvseUid, Evse>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    capabilities: BTreeSet<Capability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    floor_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates: Option<GeoCoordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    physical_reference: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    directions: BTreeSet<DisplayText>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    images: BTreeSet<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    energy_meter: Option<EnergyMeter>,
    #[serde(with = "timestamp")]
    created: DateTime<Utc>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
    #[serde(skip)]
    etag: String,
}

#[derive(Deserialize)]
struct ChargingStationRecord {
    #[serde(default, alias = "uid")]
    id: Option<ChargingStationId>,
    #[serde(default, alias = "evse")]
    evses: Vec<Value>,
    #[serde(default)]
    capabilities: BTreeSet<Capability>,
    #[serde(default)]
    floor_level: Option<String>,
    #[serde(default)]
    coordinates: Option<GeoCoordinates>,
    #[serde(default)]
    physical_reference: Option<String>,
    #[serde(default)]
    directions: BTreeSet<DisplayText>,
    #[serde(default)]
    images: BTreeSet<Image>,
    #[serde(default)]
    energy_meter: Option<EnergyMeter>,
    #[serde(default, with = "timestamp_option")]
    created: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
}

/// Everything a station is made of except its ETag.
pub(super) struct StationParts {
    pub id: ChargingStationId,
    pub evses: BTreeMap<EvseUid, Evse>,
    pub capabilities: BTreeSet<Capability>,
    pub floor_level: Option<String>,
    pub coordinates: Option<GeoCoordinates>,
    pub physical_reference: Option<String>,
    pub directions: BTreeSet<DisplayText>,
    pub images: BTreeSet<Image>,
    pub energy_meter: Option<EnergyMeter>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl ChargingStation {
    /// A station with the given EVSEs; EVSEs sharing a uid collapse to the last one.
    pub fn new(id: ChargingStationId, evses: impl IntoIterator<Item = Evse>, last_updated: DateTime<Utc>) -> Self {
        Self::assemble(StationParts {
            id,
            evses: evses.into_iter().map(|evse| (evse.uid().clone(), evse)).collect(),
            capabilities: BTreeSet::new(),
            floor_level: None,
            coordinates: None,
            physical_reference: None,
            directions: BTreeSet::new(),
            images: BTreeSet::new(),
            energy_meter: None,
            created: last_updated,
            last_updated,
        })
    }

    pub(super) fn assemble(parts: StationParts) -> Self {
        let mut station = Self {
            id: parts.id,
            evses: parts.evses,
            capabilities: parts.capabilities,
            floor_level: parts.floor_level,
            coordinates: parts.coordinates,
            physical_reference: parts.physical_reference,
            directions: parts.directions,
            images: parts.images,
            energy_meter: parts.energy_meter,
            created: parts.created,
            last_updated: parts.last_updated,
            etag: String::new(),
        };
        station.etag = station.compute_hash();
        station
    }

    /// Parse a station from its JSON form.
    ///
    /// `id_hint` is the station id from outside the body (typically the URL
    /// path). When both are present they must be equal.
    pub fn parse(json: &Value, id_hint: Option<&ChargingStationId>) -> DomainResult<Self> {
        let record = ChargingStationRecord::deserialize(json)
            .map_err(|e| DomainError::invalid_format(ENTITY, e.to_string()))?;
        let id = resolve_identifier(ENTITY, record.id, id_hint)?;

        let mut builder = ChargingStationBuilder::new(id);
        for (index, json) in record.evses.iter().enumerate() {
            let evse = Evse::parse(json, None).map_err(|e| DomainError::ChildParseFailure {
                entity: ENTITY,
                child: format!("evses[{}]", index),
                message: e.to_string(),
            })?;
            if builder.evses.contains_key(evse.uid()) {
                return Err(DomainError::invalid_format(
                    ENTITY,
                    format!("duplicate EVSE uid '{}'", evse.uid()),
                ));
            }
            builder.evses.insert(evse.uid().clone(), evse);
        }
        builder.capabilities = record.capabilities;
        builder.floor_level = record.floor_level;
        builder.coordinates = record.coordinates;
        builder.physical_reference = record.physical_reference;
        builder.directions = record.directions;
        builder.images = record.images;
        builder.energy_meter = record.energy_meter;
        builder.created = record.created;
        builder.last_updated = Some(record.last_updated);

        let station = builder
            .to_immutable()
            .map_err(|warnings| DomainError::invalid_format(ENTITY, warnings.join("; ")))?;
        debug!(id = %station.id, etag = %station.etag, evses = station.evses.len(), "Parsed charging station");
        Ok(station)
    }

    pub fn try_parse(json: &Value, id_hint: Option<&ChargingStationId>) -> Option<Self> {
        Self::parse(json, id_hint).ok()
    }

    pub fn id(&self) -> &ChargingStationId {
        &self.id
    }

    /// EVSEs in uid order, each paired with this station.
    pub fn evses(&self) -> impl Iterator<Item = EvseRef<'_>> {
        self.evses.values().map(move |evse| EvseRef { station: self, evse })
    }

    pub fn evse(&self, uid: &EvseUid) -> Option<EvseRef<'_>> {
        self.evses.get(uid).map(|evse| EvseRef { station: self, evse })
    }

    pub fn evse_count(&self) -> usize {
        self.evses.len()
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn floor_level(&self) -> Option<&str> {
        self.floor_level.as_deref()
    }

    pub fn coordinates(&self) -> Option<&GeoCoordinates> {
        self.coordinates.as_ref()
    }

    pub fn physical_reference(&self) -> Option<&str> {
        self.physical_reference.as_deref()
    }

    pub fn directions(&self) -> &BTreeSet<DisplayText> {
        &self.directions
    }

    pub fn images(&self) -> &BTreeSet<Image> {
        &self.images
    }

    pub fn energy_meter(&self) -> Option<&EnergyMeter> {
        self.energy_meter.as_ref()
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// ETag computed when this value was constructed.
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Replace the EVSE with the same uid, or add it. `last_updated` moves
    /// up to the EVSE's when that is newer.
    pub fn with_evse(&self, evse: Evse) -> Self {
        let mut builder = self.to_builder();
        builder.last_updated = Some(self.last_updated.max(evse.last_updated()));
        builder.evses.insert(evse.uid().clone(), evse);
        Self::assemble(builder.into_parts(self.id.clone()))
    }

    pub fn to_builder(&self) -> ChargingStationBuilder {
        ChargingStationBuilder {
            id: Some(self.id.clone()),
            evses: self.evses.clone(),
            capabilities: self.capabilities.clone(),
            floor_level: self.floor_level.clone(),
            coordinates: self.coordinates,
            physical_reference: self.physical_reference.clone(),
            directions: self.directions.clone(),
            images: self.images.clone(),
            energy_meter: self.energy_meter.clone(),
            created: Some(self.created),
            last_updated: Some(self.last_updated),
        }
    }
}

impl Patchable for ChargingStation {
    const ENTITY: &'static str = ENTITY;
    const PROTECTED_FIELDS: &'static [&'static str] = &["id", "uid", "evses", "evse"];

    fn identifier(&self) -> String {
        self.id.to_string()
    }

    fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    fn to_json(&self) -> Map<String, Value> {
        to_json_object(self)
    }

    fn reparse(json: Value) -> DomainResult<Self> {
        Self::parse(&json, None)
    }
}

/// An EVSE seen from the station that owns it.
#[derive(Debug, Clone, Copy)]
pub struct EvseRef<'a> {
    station: &'a ChargingStation,
    evse: &'a Evse,
}

impl<'a> EvseRef<'a> {
    pub fn parent(&self) -> &'a ChargingStation {
        self.station
    }

    pub fn evse(&self) -> &'a Evse {
        self.evse
    }
}

impl Deref for EvseRef<'_> {
    type Target = Evse;

    fn deref(&self) -> &Evse {
        self.evse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::EvseStatus;
    use crate::support::hashing::content_hash;
    use chrono::TimeZone;
    use serde_json::json;

    fn evse_json(uid: &str) -> Value {
        json!({
            "uid": uid,
            "status": "AVAILABLE",
            "connectors": [{
                "id": "1",
                "standard": "IEC_62196_T2",
                "format": "SOCKET",
                "power_type": "AC_3_PHASE",
                "max_voltage": 230,
                "max_amperage": 32,
                "last_updated": "2024-01-01T00:00:00Z"
            }],
            "last_updated": "2024-01-01T00:00:00Z"
        })
    }

    fn sample_json() -> Value {
        json!({
            "id": "CS-1",
            "evses": [evse_json("E2"), evse_json("E1")],
            "capabilities": ["RFID_READER", "CREDIT_CARD_PAYABLE"],
            "coordinates": {"latitude": "51.0475600", "longitude": "3.729944"},
            "directions": [{"language": "en", "text": "Behind the bakery"}],
            "last_updated": "2024-01-01T00:00:00Z"
        })
    }

    #[test]
    fn parse_reads_station() {
        let station = ChargingStation::parse(&sample_json(), None).unwrap();
        assert_eq!(station.id().as_str(), "CS-1");
        assert_eq!(station.evse_count(), 2);
        assert_eq!(station.capabilities().len(), 2);
        assert_eq!(station.created(), station.last_updated());
        assert_eq!(station.etag(), station.compute_hash());
    }

    #[test]
    fn uid_and_evse_aliases_are_accepted() {
        let json = json!({
            "uid": "CS-1",
            "evse": [evse_json("E1")],
            "last_updated": "2024-01-01T00:00:00Z"
        });
        let station = ChargingStation::parse(&json, None).unwrap();
        assert_eq!(station.id().as_str(), "CS-1");
        assert_eq!(station.evse_count(), 1);
        assert!(station.to_json().contains_key("evses"));
    }

    #[test]
    fn identifier_resolution() {
        let route = ChargingStationId::parse("cs-1").unwrap();
        assert!(ChargingStation::parse(&sample_json(), Some(&route)).is_ok());

        let other = ChargingStationId::parse("CS-2").unwrap();
        assert!(matches!(
            ChargingStation::parse(&sample_json(), Some(&other)),
            Err(DomainError::ConflictingIdentifier { .. })
        ));

        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("id");
        assert_eq!(
            ChargingStation::parse(&json, None).unwrap_err(),
            DomainError::MissingIdentifier { entity: ENTITY }
        );
    }

    #[test]
    fn first_bad_evse_is_reported() {
        let mut json = sample_json();
        json["evses"][0]["last_updated"] = json!("yesterday");
        json["evses"][1]["connectors"] = json!("nope");
        match ChargingStation::parse(&json, None).unwrap_err() {
            DomainError::ChildParseFailure { child, .. } => assert_eq!(child, "evses[0]"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duplicate_evse_uids_are_rejected() {
        let mut json = sample_json();
        json["evses"] = json!([evse_json("E1"), evse_json("e1")]);
        assert!(matches!(
            ChargingStation::parse(&json, None),
            Err(DomainError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn json_is_deterministic() {
        let station = ChargingStation::parse(&sample_json(), None).unwrap();
        let mut reordered = sample_json();
        reordered["evses"] = json!([evse_json("E1"), evse_json("E2")]);
        reordered["capabilities"] = json!(["CREDIT_CARD_PAYABLE", "RFID_READER"]);
        let other = ChargingStation::parse(&reordered, None).unwrap();
        assert_eq!(station.etag(), other.etag());

        let json = station.to_json();
        let uids: Vec<&str> = json["evses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|evse| evse["uid"].as_str().unwrap())
            .collect();
        assert_eq!(uids, vec!["E1", "E2"]);
        assert_eq!(json["coordinates"]["latitude"], json!("51.04756"));
        assert!(!json.contains_key("floor_level"));
        assert_eq!(station.etag(), content_hash(&json));
    }

    #[test]
    fn round_trip_keeps_etag() {
        let station = ChargingStation::parse(&sample_json(), None).unwrap();
        let again = ChargingStation::parse(&Value::Object(station.to_json()), None).unwrap();
        assert_eq!(station, again);
        assert_eq!(station.etag(), again.etag());
    }

    #[test]
    fn evse_refs_know_their_parent() {
        let station = ChargingStation::parse(&sample_json(), None).unwrap();
        for evse in station.evses() {
            assert_eq!(evse.parent().id(), station.id());
        }
        let uid = EvseUid::parse("e1").unwrap();
        let evse = station.evse(&uid).unwrap();
        assert_eq!(evse.uid().as_str(), "E1");
        assert_eq!(evse.parent().etag(), station.etag());
    }

    #[test]
    fn with_evse_replaces_and_rehashes() {
        let station = ChargingStation::parse(&sample_json(), None).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let replacement = Evse::new(EvseUid::parse("E1").unwrap(), EvseStatus::OutOfOrder, later);
        let updated = station.with_evse(replacement);

        assert_eq!(updated.evse_count(), 2);
        let uid = EvseUid::parse("E1").unwrap();
        assert_eq!(updated.evse(&uid).unwrap().status(), EvseStatus::OutOfOrder);
        assert_eq!(updated.last_updated(), later);
        assert_ne!(updated.etag(), station.etag());
        assert_eq!(updated.etag(), updated.compute_hash());
        assert_eq!(station.evse(&uid).unwrap().status(), EvseStatus::Available);
    }

    #[test]
    fn new_computes_etag() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let station = ChargingStation::new(
            ChargingStationId::parse("CS-9").unwrap(),
            vec![Evse::new(EvseUid::parse("A").unwrap(), EvseStatus::Available, at)],
            at,
        );
        assert_eq!(station.etag(), station.compute_hash());
        assert_eq!(station.created(), at);
    }

    #[test]
    fn created_must_not_follow_last_updated() {
        let mut json = sample_json();
        json["created"] = json!("2025-01-01T00:00:00Z");
        assert!(matches!(
            ChargingStation::parse(&json, None),
            Err(DomainError::InvalidFormat { .. })
        ));
    }
}
