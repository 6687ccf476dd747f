//! Property tests for identifiers, ETags and merge-patch
//!
//! - identifiers: trim + case-insensitive round trip
//! - ETag: serialize -> parse keeps the content hash
//! - patch: timestamps advance, protected fields and stale timestamps refuse

use chrono::{DateTime, Duration, TimeZone, Utc};
use ocpi_bindings::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};

// ============================================================================
// Strategies
// ============================================================================

fn identifier_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9*_-]{0,35}"
}

fn padding() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    // 2015-01-01 .. 2030-01-01, millisecond precision
    (1_420_070_400_000i64..1_893_456_000_000i64).prop_map(|millis| {
        Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
    })
}

fn coordinates() -> impl Strategy<Value = GeoCoordinates> {
    (-90_000_000i64..=90_000_000i64, -180_000_000i64..=180_000_000i64).prop_map(|(lat, lon)| {
        GeoCoordinates::new(Decimal::new(lat, 6), Decimal::new(lon, 6)).unwrap()
    })
}

fn capability() -> impl Strategy<Value = Capability> {
    prop::sample::select(Capability::ALL.to_vec())
}

fn evse_status() -> impl Strategy<Value = EvseStatus> {
    prop::sample::select(EvseStatus::ALL.to_vec())
}

fn station() -> impl Strategy<Value = ChargingStation> {
    (
        identifier_text(),
        prop::collection::vec((identifier_text(), evse_status()), 0..4),
        prop::collection::btree_set(capability(), 0..4),
        prop::option::of("[0-9A-Z-]{1,4}"),
        prop::option::of(coordinates()),
        timestamp(),
    )
        .prop_map(|(id, evses, capabilities, floor_level, coordinates, last_updated)| {
            let mut builder = ChargingStationBuilder::new(ChargingStationId::parse(&id).unwrap());
            for (uid, status) in evses {
                builder = builder.evse(Evse::new(EvseUid::parse(&uid).unwrap(), status, last_updated));
            }
            builder.capabilities = capabilities;
            builder.floor_level = floor_level;
            builder.coordinates = coordinates;
            builder.last_updated = Some(last_updated);
            builder.to_immutable().unwrap()
        })
}

// ============================================================================
// Identifier Property Tests
// ============================================================================

proptest! {
    #[test]
    fn identifier_round_trips_trimmed_text(text in identifier_text(), left in padding(), right in padding()) {
        let padded = format!("{}{}{}", left, text, right);
        let id = EvseUid::parse(&padded).unwrap();
        prop_assert_eq!(id.to_string(), text);
    }

    #[test]
    fn identifier_ignores_case_and_padding(text in identifier_text(), left in padding()) {
        let upper = EvseUid::parse(&format!("{}{}", left, text.to_uppercase())).unwrap();
        let lower = EvseUid::parse(&text.to_lowercase()).unwrap();
        prop_assert_eq!(&upper, &lower);
        prop_assert_eq!(upper.cmp(&lower), std::cmp::Ordering::Equal);
    }
}

// ============================================================================
// ETag Property Tests
// ============================================================================

proptest! {
    #[test]
    fn parse_of_to_json_keeps_hash(station in station()) {
        let json = Value::Object(station.to_json());
        let again = ChargingStation::parse(&json, None).unwrap();
        prop_assert_eq!(station.compute_hash(), again.compute_hash());
        prop_assert_eq!(station.etag(), again.etag());
    }

    #[test]
    fn etag_is_cached_hash(station in station()) {
        prop_assert_eq!(station.etag(), station.compute_hash());
    }
}

// ============================================================================
// Merge-patch Property Tests
// ============================================================================

proptest! {
    #[test]
    fn unstamped_patch_advances_last_updated(station in station(), floor in "[0-9]{1,4}") {
        let patch = json!({ "floor_level": floor });
        let patched = station.apply_merge_patch(patch.as_object().unwrap(), false).unwrap();
        prop_assert!(patched.last_updated() > station.last_updated());
    }

    #[test]
    fn identifier_keys_are_refused(
        station in station(),
        key in prop::sample::select(vec!["id", "uid", "evses", "evse"]),
        value in prop::sample::select(vec![json!("X"), json!(null), json!([]), json!({})]),
    ) {
        let before = station.clone();
        let mut patch = serde_json::Map::new();
        patch.insert(key.to_string(), value);
        let err = station.apply_merge_patch(&patch, false).unwrap_err();
        let is_protected = matches!(err, DomainError::ProtectedFieldViolation { .. });
        prop_assert!(is_protected);
        prop_assert_eq!(&station, &before);
        prop_assert_eq!(station.etag(), before.etag());
    }

    #[test]
    fn stale_timestamps_are_refused(station in station(), back_ms in 0i64..10_000_000_000i64) {
        let before = station.clone();
        let stale = station.last_updated() - Duration::milliseconds(back_ms);
        let patch = json!({
            "floor_level": "9",
            "last_updated": stale.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
        });
        let err = station.apply_merge_patch(patch.as_object().unwrap(), false).unwrap_err();
        let is_stale = matches!(err, DomainError::StaleTimestamp { .. });
        prop_assert!(is_stale);
        prop_assert_eq!(&station, &before);
    }
}
