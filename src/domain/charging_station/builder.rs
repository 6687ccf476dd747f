//! Mutable staging area for a [`ChargingStation`]

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use validator::{Validate, ValidationError, ValidationErrors};

use super::evse::Evse;
use super::model::{ChargingStation, StationParts};
use crate::domain::common::{Capability, ChargingStationId, DisplayText, EnergyMeter, EvseUid, GeoCoordinates, Image};
use crate::support::errors::DomainError;

#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_station"))]
pub struct ChargingStationBuilder {
    #[validate(required(message = "a charging station needs an id"))]
    pub id: Option<ChargingStationId>,
    pub evses: BTreeMap<EvseUid, Evse>,
    pub capabilities: BTreeSet<Capability>,
    #[validate(length(max = 4, message = "must be at most 4 characters"))]
    pub floor_level: Option<String>,
    pub coordinates: Option<GeoCoordinates>,
    #[validate(length(max = 16, message = "must be at most 16 characters"))]
    pub physical_reference: Option<String>,
    pub directions: BTreeSet<DisplayText>,
    pub images: BTreeSet<Image>,
    pub energy_meter: Option<EnergyMeter>,
    /// Defaults to `last_updated`.
    pub created: Option<DateTime<Utc>>,
    /// Defaults to now.
    pub last_updated: Option<DateTime<Utc>>,
}

fn validate_station(builder: &ChargingStationBuilder) -> Result<(), ValidationError> {
    if builder.id.as_ref().is_some_and(|id| id.is_null_or_empty()) {
        let mut error = ValidationError::new("empty_id");
        error.message = Some("the charging station id must not be empty".into());
        return Err(error);
    }
    if let (Some(created), Some(last_updated)) = (builder.created, builder.last_updated) {
        if created > last_updated {
            let mut error = ValidationError::new("timestamp_order");
            error.message = Some("created must not be later than last_updated".into());
            return Err(error);
        }
    }
    Ok(())
}

/// Flatten validation errors to `field: message` lines, sorted.
fn warnings(errors: &ValidationErrors) -> Vec<String> {
    let mut warnings: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                if *field == "__all__" {
                    msg
                } else {
                    format!("{}: {}", field, msg)
                }
            })
        })
        .collect();
    warnings.sort();
    warnings
}

impl ChargingStationBuilder {
    pub fn new(id: ChargingStationId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Add an EVSE, replacing one with the same uid.
    pub fn evse(mut self, evse: Evse) -> Self {
        self.evses.insert(evse.uid().clone(), evse);
        self
    }

    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn floor_level(mut self, floor_level: impl Into<String>) -> Self {
        self.floor_level = Some(floor_level.into());
        self
    }

    pub fn coordinates(mut self, coordinates: GeoCoordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn physical_reference(mut self, reference: impl Into<String>) -> Self {
        self.physical_reference = Some(reference.into());
        self
    }

    pub fn direction(mut self, direction: DisplayText) -> Self {
        self.directions.insert(direction);
        self
    }

    pub fn image(mut self, image: Image) -> Self {
        self.images.insert(image);
        self
    }

    pub fn energy_meter(mut self, meter: EnergyMeter) -> Self {
        self.energy_meter = Some(meter);
        self
    }

    pub fn last_updated(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = Some(at);
        self
    }

    /// Validate and freeze. Missing optional fields never fail; the error
    /// lists every violated rule.
    pub fn to_immutable(&self) -> Result<ChargingStation, Vec<String>> {
        let mut found = self.validate().err().map(|errors| warnings(&errors)).unwrap_or_default();
        let evses = match self.evses_by_uid() {
            Ok(evses) => evses,
            Err(duplicates) => {
                found.extend(duplicates);
                BTreeMap::new()
            }
        };
        if !found.is_empty() {
            found.sort();
            return Err(found);
        }
        let id = self
            .id
            .clone()
            .ok_or_else(|| vec!["id: a charging station needs an id".to_string()])?;
        let mut parts = self.clone().into_parts(id);
        parts.evses = evses;
        Ok(ChargingStation::assemble(parts))
    }

    /// Re-key the EVSEs by their own uid; the map keys are not trusted.
    fn evses_by_uid(&self) -> Result<BTreeMap<EvseUid, Evse>, Vec<String>> {
        let mut evses = BTreeMap::new();
        let mut duplicates = Vec::new();
        for evse in self.evses.values() {
            if evses.insert(evse.uid().clone(), evse.clone()).is_some() {
                duplicates.push(format!("evses: duplicate EVSE uid '{}'", evse.uid()));
            }
        }
        if duplicates.is_empty() {
            Ok(evses)
        } else {
            Err(duplicates)
        }
    }

    /// Like [`to_immutable`](Self::to_immutable) with the warnings wrapped
    /// in [`DomainError::ValidationFailure`].
    pub fn build(&self) -> Result<ChargingStation, DomainError> {
        self.to_immutable().map_err(DomainError::ValidationFailure)
    }

    pub(super) fn into_parts(self, id: ChargingStationId) -> StationParts {
        let last_updated = match (self.last_updated, self.created) {
            (Some(last_updated), _) => last_updated,
            (None, Some(created)) => created.max(Utc::now()),
            (None, None) => Utc::now(),
        };
        StationParts {
            id,
            evses: self.evses,
            capabilities: self.capabilities,
            floor_level: self.floor_level,
            coordinates: self.coordinates,
            physical_reference: self.physical_reference,
            directions: self.directions,
            images: self.images,
            energy_meter: self.energy_meter,
            created: self.created.unwrap_or(last_updated),
            last_updated,
        }
    }
}
