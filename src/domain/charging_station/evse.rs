//! EVSE: the part of a charging station that charges one vehicle at a time

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::connector::Connector;
use crate::domain::common::{Capability, ConnectorId, DisplayText, EvseStatus, EvseUid, GeoCoordinates};
use crate::domain::patch::Patchable;
use crate::support::errors::{DomainError, DomainResult};
use crate::support::id::{max_length, resolve_identifier};
use crate::support::serializations::{map_values, to_json_object};
use crate::support::time::timestamp;

const ENTITY: &str = "EVSE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evse {
    uid: EvseUid,
    /// eMI3 EVSE ID, e.g. `DE*ABC*E123456`.
    #[serde(skip_serializing_if = "Option::is_none")]
    evse_id: Option<String>,
    status: EvseStatus,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    capabilities: BTreeSet<Capability>,
    #[serde(serialize_with = "map_values", skip_serializing_if = "BTreeMap::is_empty")]
    connectors: BTreeMap<ConnectorId, Connector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    floor_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates: Option<GeoCoordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    physical_reference: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    directions: BTreeSet<DisplayText>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
    #[serde(skip)]
    etag: String,
}

#[derive(Deserialize)]
struct EvseRecord {
    #[serde(default)]
    uid: Option<EvseUid>,
    #[serde(default)]
    evse_id: Option<String>,
    #[serde(default)]
    status: EvseStatus,
    #[serde(default)]
    capabilities: BTreeSet<Capability>,
    #[serde(default)]
    connectors: Vec<Value>,
    #[serde(default)]
    floor_level: Option<String>,
    #[serde(default)]
    coordinates: Option<GeoCoordinates>,
    #[serde(default)]
    physical_reference: Option<String>,
    #[serde(default)]
    directions: BTreeSet<DisplayText>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
}

impl Evse {
    pub fn new(uid: EvseUid, status: EvseStatus, last_updated: DateTime<Utc>) -> Self {
        Self {
            uid,
            evse_id: None,
            status,
            capabilities: BTreeSet::new(),
            connectors: BTreeMap::new(),
            floor_level: None,
            coordinates: None,
            physical_reference: None,
            directions: BTreeSet::new(),
            last_updated,
            etag: String::new(),
        }
        .sealed()
    }

    /// Parse an EVSE; `uid_hint` is a uid supplied out of band.
    pub fn parse(json: &Value, uid_hint: Option<&EvseUid>) -> DomainResult<Self> {
        let record = EvseRecord::deserialize(json).map_err(|e| DomainError::invalid_format(ENTITY, e.to_string()))?;
        let uid = resolve_identifier(ENTITY, record.uid, uid_hint)?;

        check_length("evse_id", record.evse_id.as_deref(), 48)?;
        check_length("floor_level", record.floor_level.as_deref(), 4)?;
        check_length("physical_reference", record.physical_reference.as_deref(), 16)?;

        let mut connectors = BTreeMap::new();
        for (index, json) in record.connectors.iter().enumerate() {
            let connector = Connector::parse(json, None).map_err(|e| DomainError::ChildParseFailure {
                entity: ENTITY,
                child: format!("connectors[{}]", index),
                message: e.to_string(),
            })?;
            if connectors.contains_key(connector.id()) {
                return Err(DomainError::invalid_format(
                    ENTITY,
                    format!("duplicate connector id '{}'", connector.id()),
                ));
            }
            connectors.insert(connector.id().clone(), connector);
        }

        Ok(Self {
            uid,
            evse_id: record.evse_id,
            status: record.status,
            capabilities: record.capabilities,
            connectors,
            floor_level: record.floor_level,
            coordinates: record.coordinates,
            physical_reference: record.physical_reference,
            directions: record.directions,
            last_updated: record.last_updated,
            etag: String::new(),
        }
        .sealed())
    }

    pub fn try_parse(json: &Value, uid_hint: Option<&EvseUid>) -> Option<Self> {
        Self::parse(json, uid_hint).ok()
    }

    fn sealed(mut self) -> Self {
        self.etag = self.compute_hash();
        self
    }

    /// Replace the connector with the same id, or add it.
    pub fn with_connector(&self, connector: Connector) -> Self {
        let mut evse = self.clone();
        evse.last_updated = evse.last_updated.max(connector.last_updated());
        evse.connectors.insert(connector.id().clone(), connector);
        evse.sealed()
    }

    pub fn with_status(&self, status: EvseStatus, at: DateTime<Utc>) -> Self {
        let mut evse = self.clone();
        evse.status = status;
        evse.last_updated = evse.last_updated.max(at);
        evse.sealed()
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self.sealed()
    }

    pub fn uid(&self) -> &EvseUid {
        &self.uid
    }

    pub fn evse_id(&self) -> Option<&str> {
        self.evse_id.as_deref()
    }

    pub fn status(&self) -> EvseStatus {
        self.status
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.values()
    }

    pub fn connector(&self, id: &ConnectorId) -> Option<&Connector> {
        self.connectors.get(id)
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

    pub fn etag(&self) -> &str {
        &self.etag
    }
}

fn check_length(field: &str, value: Option<&str>, max: usize) -> DomainResult<()> {
    match value {
        Some(text) => max_length(text, max).map_err(|reason| DomainError::invalid_format(field, reason)),
        None => Ok(()),
    }
}

impl Patchable for Evse {
    const ENTITY: &'static str = ENTITY;
    const PROTECTED_FIELDS: &'static [&'static str] = &["uid", "connectors"];

    fn identifier(&self) -> String {
        self.uid.to_string()
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
