//! Tariff entity

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::price_component::PriceComponent;
use super::restrictions::TariffRestrictions;
use crate::domain::common::{CountryCode, DisplayText, PartyId, Price, TariffId};
use crate::domain::patch::Patchable;
use crate::support::enums::ocpi_enum;
use crate::support::errors::{DomainError, DomainResult};
use crate::support::id::resolve_identifier;
use crate::support::serializations::to_json_object;
use crate::support::time::{timestamp, timestamp_option};

const ENTITY: &str = "tariff";

ocpi_enum!(
    /// Purpose of a tariff.
    TariffType, "tariff type" {
        AdHocPayment => "AD_HOC_PAYMENT",
        ProfileCheap => "PROFILE_CHEAP",
        ProfileFast => "PROFILE_FAST",
        ProfileGreen => "PROFILE_GREEN",
        Regular => "REGULAR",
    }
);

/// Price components that apply together under one set of restrictions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TariffElement {
    pub price_components: Vec<PriceComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<TariffRestrictions>,
}

impl TariffElement {
    pub fn new(price_components: Vec<PriceComponent>) -> Self {
        Self {
            price_components,
            restrictions: None,
        }
    }

    pub fn with_restrictions(mut self, restrictions: TariffRestrictions) -> Self {
        self.restrictions = if restrictions.is_empty() { None } else { Some(restrictions) };
        self
    }

    pub fn parse(json: &Value) -> DomainResult<Self> {
        let element = Self::deserialize(json).map_err(|e| DomainError::invalid_format("tariff element", e.to_string()))?;
        if element.price_components.is_empty() {
            return Err(DomainError::invalid_format(
                "tariff element",
                "at least one price component is required",
            ));
        }
        Ok(element)
    }

    /// Whether the element's restrictions allow it at the given local time.
    pub fn applies_at(&self, local: NaiveDateTime) -> bool {
        self.restrictions
            .as_ref()
            .map_or(true, |r| r.applies_on(local.date()) && r.applies_at_time(local.time()))
    }
}

/// Tariff of a charge point operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tariff {
    country_code: CountryCode,
    party_id: PartyId,
    id: TariffId,
    /// ISO 4217 currency code.
    currency: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    tariff_type: Option<TariffType>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    tariff_alt_text: BTreeSet<DisplayText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tariff_alt_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_price: Option<Price>,
    elements: Vec<TariffElement>,
    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp_option")]
    start_date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp_option")]
    end_date_time: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
    #[serde(skip)]
    etag: String,
}

#[derive(Deserialize)]
struct TariffRecord {
    country_code: CountryCode,
    party_id: PartyId,
    #[serde(default)]
    id: Option<TariffId>,
    currency: String,
    #[serde(default, rename = "type")]
    tariff_type: Option<TariffType>,
    #[serde(default)]
    tariff_alt_text: BTreeSet<DisplayText>,
    #[serde(default)]
    tariff_alt_url: Option<String>,
    #[serde(default)]
    min_price: Option<Price>,
    #[serde(default)]
    max_price: Option<Price>,
    #[serde(default)]
    elements: Vec<Value>,
    #[serde(default, with = "timestamp_option")]
    start_date_time: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp_option")]
    end_date_time: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
}

impl Tariff {
    pub fn new(
        country_code: CountryCode,
        party_id: PartyId,
        id: TariffId,
        currency: &str,
        elements: Vec<TariffElement>,
        last_updated: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut tariff = Self {
            country_code,
            party_id,
            id,
            currency: validate_currency(currency)?,
            tariff_type: None,
            tariff_alt_text: BTreeSet::new(),
            tariff_alt_url: None,
            min_price: None,
            max_price: None,
            elements,
            start_date_time: None,
            end_date_time: None,
            last_updated,
            etag: String::new(),
        };
        tariff.validate()?;
        tariff.etag = tariff.compute_hash();
        Ok(tariff)
    }

    /// Parse a tariff. `id_hint` is the id taken from outside the body,
    /// e.g. the request path.
    pub fn parse(json: &Value, id_hint: Option<&TariffId>) -> DomainResult<Self> {
        let record = TariffRecord::deserialize(json).map_err(|e| DomainError::invalid_format(ENTITY, e.to_string()))?;
        let id = resolve_identifier(ENTITY, record.id, id_hint)?;

        let mut elements = Vec::with_capacity(record.elements.len());
        for (index, element) in record.elements.iter().enumerate() {
            let element = TariffElement::parse(element).map_err(|e| DomainError::ChildParseFailure {
                entity: ENTITY,
                child: format!("elements[{}]", index),
                message: e.to_string(),
            })?;
            elements.push(element);
        }

        let mut tariff = Self {
            country_code: record.country_code,
            party_id: record.party_id,
            id,
            currency: validate_currency(&record.currency)?,
            tariff_type: record.tariff_type,
            tariff_alt_text: record.tariff_alt_text,
            tariff_alt_url: record.tariff_alt_url,
            min_price: record.min_price,
            max_price: record.max_price,
            elements,
            start_date_time: record.start_date_time,
            end_date_time: record.end_date_time,
            last_updated: record.last_updated,
            etag: String::new(),
        };
        tariff.validate()?;
        tariff.etag = tariff.compute_hash();
        debug!(id = %tariff.id, etag = %tariff.etag, "Parsed tariff");
        Ok(tariff)
    }

    pub fn try_parse(json: &Value, id_hint: Option<&TariffId>) -> Option<Self> {
        Self::parse(json, id_hint).ok()
    }

    fn validate(&self) -> DomainResult<()> {
        if self.elements.is_empty() {
            return Err(DomainError::invalid_format(ENTITY, "at least one tariff element is required"));
        }
        if let (Some(start), Some(end)) = (self.start_date_time, self.end_date_time) {
            if end <= start {
                return Err(DomainError::invalid_format(ENTITY, "end_date_time must be after start_date_time"));
            }
        }
        Ok(())
    }

    pub fn country_code(&self) -> &CountryCode {
        &self.country_code
    }

    pub fn party_id(&self) -> &PartyId {
        &self.party_id
    }

    pub fn id(&self) -> &TariffId {
        &self.id
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn tariff_type(&self) -> Option<TariffType> {
        self.tariff_type
    }

    pub fn tariff_alt_text(&self) -> &BTreeSet<DisplayText> {
        &self.tariff_alt_text
    }

    pub fn min_price(&self) -> Option<&Price> {
        self.min_price.as_ref()
    }

    pub fn max_price(&self) -> Option<&Price> {
        self.max_price.as_ref()
    }

    pub fn elements(&self) -> &[TariffElement] {
        &self.elements
    }

    pub fn start_date_time(&self) -> Option<DateTime<Utc>> {
        self.start_date_time
    }

    pub fn end_date_time(&self) -> Option<DateTime<Utc>> {
        self.end_date_time
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Whether the tariff is in force at the given instant.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.start_date_time.map_or(true, |start| at >= start) && self.end_date_time.map_or(true, |end| at < end)
    }

    /// Elements whose restrictions allow them at the given local time.
    pub fn active_elements(&self, local: NaiveDateTime) -> impl Iterator<Item = &TariffElement> {
        self.elements.iter().filter(move |element| element.applies_at(local))
    }
}

fn validate_currency(currency: &str) -> DomainResult<String> {
    let currency = currency.trim();
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(currency.to_ascii_uppercase())
    } else {
        Err(DomainError::invalid_format("currency", format!("'{}' is not an ISO 4217 code", currency)))
    }
}

impl Patchable for Tariff {
    const ENTITY: &'static str = ENTITY;
    const PROTECTED_FIELDS: &'static [&'static str] = &["country_code", "party_id", "id"];

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
