//! Shared, lock-guarded handle to a charging station

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::info;

use super::connector::Connector;
use super::evse::Evse;
use super::model::ChargingStation;
use crate::config::PatchConfig;
use crate::domain::common::EvseUid;
use crate::domain::patch::{PatchResult, Patchable};
use crate::support::errors::{DomainError, DomainResult};

/// The current version of one charging station, shared between callers.
///
/// Readers take cheap snapshots. Patches and EVSE or connector
/// replacements run under the write lock, so two writers against the same
/// station never interleave, and a failed patch leaves the current version
/// in place.
#[derive(Debug)]
pub struct SharedChargingStation {
    current: RwLock<Arc<ChargingStation>>,
    config: PatchConfig,
}

impl SharedChargingStation {
    pub fn new(station: ChargingStation, config: PatchConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(station)),
            config,
        }
    }

    pub fn snapshot(&self) -> Arc<ChargingStation> {
        Arc::clone(&self.current.read())
    }

    pub fn etag(&self) -> String {
        self.current.read().etag().to_string()
    }

    /// Apply a merge-patch and publish the result.
    pub fn apply_merge_patch(&self, patch: &Map<String, Value>) -> PatchResult<Arc<ChargingStation>> {
        let mut current = self.current.write();
        let patched = Arc::new(current.apply_merge_patch(patch, self.config.allow_downgrades)?);
        info!(
            id = %patched.id(),
            old_etag = %current.etag(),
            new_etag = %patched.etag(),
            "Charging station patched"
        );
        *current = Arc::clone(&patched);
        Ok(patched)
    }

    /// Replace (or add) one EVSE and publish the result.
    pub fn update_evse(&self, evse: Evse) -> Arc<ChargingStation> {
        let mut current = self.current.write();
        let updated = Arc::new(current.with_evse(evse));
        *current = Arc::clone(&updated);
        updated
    }

    /// Replace (or add) one connector of an existing EVSE and publish the
    /// result. The EVSE is looked up and rebuilt under the write lock.
    pub fn update_connector(&self, evse_uid: &EvseUid, connector: Connector) -> DomainResult<Arc<ChargingStation>> {
        let mut current = self.current.write();
        let evse = current
            .evse(evse_uid)
            .map(|evse| evse.with_connector(connector))
            .ok_or_else(|| {
                DomainError::invalid_format(
                    "evse uid",
                    format!("no EVSE '{}' in charging station '{}'", evse_uid, current.id()),
                )
            })?;
        let updated = Arc::new(current.with_evse(evse));
        *current = Arc::clone(&updated);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::{ChargingStationId, ConnectorFormat, ConnectorId, ConnectorType, EvseStatus, PowerType};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::thread;

    fn station() -> ChargingStation {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ChargingStation::new(
            ChargingStationId::parse("CS-1").unwrap(),
            vec![Evse::new(EvseUid::parse("E1").unwrap(), EvseStatus::Available, at)],
            at,
        )
    }

    #[test]
    fn successful_patch_is_published() {
        let shared = SharedChargingStation::new(station(), PatchConfig::default());
        let before = shared.snapshot();
        let patched = shared
            .apply_merge_patch(json!({"floor_level": "2"}).as_object().unwrap())
            .unwrap();
        assert_eq!(shared.etag(), patched.etag());
        assert_eq!(shared.snapshot().floor_level(), Some("2"));
        assert_eq!(before.floor_level(), None);
    }

    #[test]
    fn rejected_patch_keeps_current_version() {
        let shared = SharedChargingStation::new(station(), PatchConfig::default());
        let etag = shared.etag();
        let err = shared
            .apply_merge_patch(json!({"evse": []}).as_object().unwrap())
            .unwrap_err();
        assert!(matches!(err, DomainError::ProtectedFieldViolation { .. }));
        assert_eq!(shared.etag(), etag);
        assert_eq!(shared.snapshot().evse_count(), 1);
    }

    #[test]
    fn downgrade_policy_comes_from_config() {
        let stale = json!({"last_updated": "2023-01-01T00:00:00Z"});

        let strict = SharedChargingStation::new(station(), PatchConfig::default());
        assert!(matches!(
            strict.apply_merge_patch(stale.as_object().unwrap()),
            Err(DomainError::StaleTimestamp { .. })
        ));

        let lenient = SharedChargingStation::new(station(), PatchConfig { allow_downgrades: true });
        let patched = lenient.apply_merge_patch(stale.as_object().unwrap()).unwrap();
        assert_eq!(patched.last_updated(), Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn update_evse_replaces_child() {
        let shared = SharedChargingStation::new(station(), PatchConfig::default());
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        shared.update_evse(Evse::new(EvseUid::parse("e1").unwrap(), EvseStatus::Charging, later));
        shared.update_evse(Evse::new(EvseUid::parse("E2").unwrap(), EvseStatus::Available, later));

        let current = shared.snapshot();
        assert_eq!(current.evse_count(), 2);
        let uid = EvseUid::parse("E1").unwrap();
        assert_eq!(current.evse(&uid).unwrap().status(), EvseStatus::Charging);
    }

    fn connector(id: &str) -> Connector {
        Connector::new(
            ConnectorId::parse(id).unwrap(),
            ConnectorType::Iec62196T2,
            ConnectorFormat::Socket,
            PowerType::Ac3Phase,
            230,
            32,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn update_connector_needs_the_evse() {
        let shared = SharedChargingStation::new(station(), PatchConfig::default());
        let etag = shared.etag();
        let err = shared
            .update_connector(&EvseUid::parse("E9").unwrap(), connector("1"))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidFormat { .. }));
        assert_eq!(shared.etag(), etag);
    }

    #[test]
    fn concurrent_connector_updates_all_land() {
        let shared = Arc::new(SharedChargingStation::new(station(), PatchConfig::default()));
        let uid = EvseUid::parse("E1").unwrap();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = Arc::clone(&shared);
                let uid = uid.clone();
                thread::spawn(move || shared.update_connector(&uid, connector(&i.to_string())).is_ok())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        let current = shared.snapshot();
        assert_eq!(current.evse(&uid).unwrap().connectors().count(), 8);
        assert_eq!(current.etag(), current.compute_hash());
    }

    #[test]
    fn concurrent_patches_all_land() {
        let shared = Arc::new(SharedChargingStation::new(station(), PatchConfig::default()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let patch = json!({ "physical_reference": format!("bay-{}", i) });
                    shared.apply_merge_patch(patch.as_object().unwrap()).is_ok()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        let current = shared.snapshot();
        assert!(current.physical_reference().unwrap().starts_with("bay-"));
        assert!(current.last_updated() > Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }
}
