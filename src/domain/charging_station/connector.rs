//! Connector: one socket or cable of an EVSE

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::common::{ConnectorFormat, ConnectorId, ConnectorType, PowerType, TariffId};
use crate::domain::patch::Patchable;
use crate::support::errors::{DomainError, DomainResult};
use crate::support::id::resolve_identifier;
use crate::support::serializations::to_json_object;
use crate::support::time::timestamp;

const ENTITY: &str = "connector";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connector {
    id: ConnectorId,
    standard: ConnectorType,
    format: ConnectorFormat,
    power_type: PowerType,
    max_voltage: u32,
    max_amperage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_electric_power: Option<u32>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    tariff_ids: BTreeSet<TariffId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    terms_and_conditions: Option<String>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
    #[serde(skip)]
    etag: String,
}

#[derive(Deserialize)]
struct ConnectorRecord {
    #[serde(default)]
    id: Option<ConnectorId>,
    standard: ConnectorType,
    format: ConnectorFormat,
    power_type: PowerType,
    max_voltage: u32,
    max_amperage: u32,
    #[serde(default)]
    max_electric_power: Option<u32>,
    #[serde(default)]
    tariff_ids: BTreeSet<TariffId>,
    #[serde(default)]
    terms_and_conditions: Option<String>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
}

impl Connector {
    pub fn new(
        id: ConnectorId,
        standard: ConnectorType,
        format: ConnectorFormat,
        power_type: PowerType,
        max_voltage: u32,
        max_amperage: u32,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            standard,
            format,
            power_type,
            max_voltage,
            max_amperage,
            max_electric_power: None,
            tariff_ids: BTreeSet::new(),
            terms_and_conditions: None,
            last_updated,
            etag: String::new(),
        }
        .sealed()
    }

    /// Parse a connector; `id_hint` is an id supplied out of band.
    pub fn parse(json: &Value, id_hint: Option<&ConnectorId>) -> DomainResult<Self> {
        let record =
            ConnectorRecord::deserialize(json).map_err(|e| DomainError::invalid_format(ENTITY, e.to_string()))?;
        let id = resolve_identifier(ENTITY, record.id, id_hint)?;

        Ok(Self {
            id,
            standard: record.standard,
            format: record.format,
            power_type: record.power_type,
            max_voltage: record.max_voltage,
            max_amperage: record.max_amperage,
            max_electric_power: record.max_electric_power,
            tariff_ids: record.tariff_ids,
            terms_and_conditions: record.terms_and_conditions,
            last_updated: record.last_updated,
            etag: String::new(),
        }
        .sealed())
    }

    pub fn try_parse(json: &Value, id_hint: Option<&ConnectorId>) -> Option<Self> {
        Self::parse(json, id_hint).ok()
    }

    fn sealed(mut self) -> Self {
        self.etag = self.compute_hash();
        self
    }

    pub fn with_max_electric_power(mut self, watts: u32) -> Self {
        self.max_electric_power = Some(watts);
        self.sealed()
    }

    pub fn with_tariff(mut self, tariff_id: TariffId) -> Self {
        self.tariff_ids.insert(tariff_id);
        self.sealed()
    }

    pub fn id(&self) -> &ConnectorId {
        &self.id
    }

    pub fn standard(&self) -> ConnectorType {
        self.standard
    }

    pub fn format(&self) -> ConnectorFormat {
        self.format
    }

    pub fn power_type(&self) -> PowerType {
        self.power_type
    }

    pub fn max_voltage(&self) -> u32 {
        self.max_voltage
    }

    pub fn max_amperage(&self) -> u32 {
        self.max_amperage
    }

    pub fn max_electric_power(&self) -> Option<u32> {
        self.max_electric_power
    }

    pub fn tariff_ids(&self) -> &BTreeSet<TariffId> {
        &self.tariff_ids
    }

    pub fn terms_and_conditions(&self) -> Option<&str> {
        self.terms_and_conditions.as_deref()
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }
}

impl Patchable for Connector {
    const ENTITY: &'static str = ENTITY;
    const PROTECTED_FIELDS: &'static [&'static str] = &["id"];

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
