//! Merge-patch flow shared by the OCPI entities
//!
//! Every patchable entity goes through the same sequence:
//!
//! 1. stamp `last_updated` with the current time unless the patch sets it;
//! 2. refuse a supplied `last_updated` that does not move forward, unless
//!    downgrades are allowed;
//! 3. merge the patch into the entity's JSON, refusing protected fields;
//! 4. parse the merged JSON as a brand-new entity.
//!
//! The entity the patch is applied to is only borrowed, so a failed patch
//! cannot leave it half-changed. A patched entity passes exactly the
//! validation that parsing it from scratch would.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::support::errors::{DomainError, DomainResult};
use crate::support::hashing::content_hash;
use crate::support::merge_patch;
use crate::support::time::{format_timestamp, parse_timestamp};

pub const LAST_UPDATED: &str = "last_updated";
pub const CREATED: &str = "created";

/// Result of applying a merge-patch: the new entity or why it was refused.
pub type PatchResult<T> = DomainResult<T>;

pub trait Patchable: Sized {
    /// Human-readable entity name used in errors and logs.
    const ENTITY: &'static str;

    /// Top-level properties a patch may never name.
    const PROTECTED_FIELDS: &'static [&'static str];

    fn identifier(&self) -> String;

    fn last_updated(&self) -> DateTime<Utc>;

    fn to_json(&self) -> Map<String, Value>;

    /// Parse the merged JSON as a new entity.
    fn reparse(json: Value) -> DomainResult<Self>;

    /// base64(SHA-256) of the canonical JSON form.
    fn compute_hash(&self) -> String {
        content_hash(&self.to_json())
    }

    fn apply_merge_patch(&self, patch: &Map<String, Value>, allow_downgrades: bool) -> PatchResult<Self> {
        let current = self.last_updated();
        let mut patch = patch.clone();

        match patch.get(LAST_UPDATED) {
            None => {
                let stamp = next_timestamp(current);
                patch.insert(LAST_UPDATED.to_string(), Value::String(format_timestamp(&stamp)));
            }
            Some(Value::String(text)) => {
                let supplied = parse_timestamp(text)?;
                if !allow_downgrades && supplied <= current {
                    warn!(
                        entity = Self::ENTITY,
                        id = %self.identifier(),
                        current = %format_timestamp(&current),
                        supplied = %format_timestamp(&supplied),
                        "Rejected merge patch with stale last_updated"
                    );
                    return Err(DomainError::StaleTimestamp { current, supplied });
                }
            }
            Some(other) => {
                return Err(DomainError::invalid_format(
                    LAST_UPDATED,
                    format!("expected a timestamp string, got {}", other),
                ));
            }
        }

        let mut merged = self.to_json();
        merge_patch::apply(&mut merged, &patch, |path: &[&str]| {
            path.len() == 1 && Self::PROTECTED_FIELDS.iter().any(|field| *field == path[0])
        })
        .map_err(|field| {
            warn!(
                entity = Self::ENTITY,
                id = %self.identifier(),
                field = %field,
                "Rejected merge patch on protected field"
            );
            DomainError::ProtectedFieldViolation {
                entity: Self::ENTITY,
                field,
            }
        })?;

        if !patch.contains_key(CREATED) {
            clamp_created(&mut merged);
        }

        let patched = Self::reparse(Value::Object(merged))?;
        debug!(
            entity = Self::ENTITY,
            id = %patched.identifier(),
            last_updated = %format_timestamp(&patched.last_updated()),
            "Applied merge patch"
        );
        Ok(patched)
    }
}

/// Now, or one millisecond past `current` if the clock has not caught up,
/// so an unstamped patch always moves `last_updated` forward.
fn next_timestamp(current: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > current {
        now
    } else {
        current + Duration::milliseconds(1)
    }
}

/// Pull `created` back to `last_updated` when an accepted downgrade left it
/// later. Entities without a `created` property are untouched.
fn clamp_created(json: &mut Map<String, Value>) {
    let read = |json: &Map<String, Value>, key: &str| match json.get(key) {
        Some(Value::String(text)) => parse_timestamp(text).ok(),
        _ => None,
    };
    if let (Some(created), Some(last_updated)) = (read(json, CREATED), read(json, LAST_UPDATED)) {
        if created > last_updated {
            json.insert(CREATED.to_string(), Value::String(format_timestamp(&last_updated)));
        }
    }
}

/// Body of a patch request as a JSON object.
pub fn patch_object(patch: &Value) -> DomainResult<&Map<String, Value>> {
    patch
        .as_object()
        .ok_or_else(|| DomainError::invalid_format("merge patch", "expected a JSON object"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn next_timestamp_advances() {
        let past = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(next_timestamp(past) > past);

        let future = Utc::now() + Duration::days(1);
        assert_eq!(next_timestamp(future), future + Duration::milliseconds(1));
    }

    #[test]
    fn clamp_created_follows_downgrade() {
        let mut json = serde_json::json!({
            "created": "2024-01-01T00:00:00Z",
            "last_updated": "2023-12-31T00:00:00Z"
        });
        let map = json.as_object_mut().unwrap();
        clamp_created(map);
        let created = parse_timestamp(map[CREATED].as_str().unwrap()).unwrap();
        assert_eq!(created, Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap());

        let mut untouched = serde_json::json!({"last_updated": "2023-12-31T00:00:00Z"});
        let map = untouched.as_object_mut().unwrap();
        clamp_created(map);
        assert!(!map.contains_key(CREATED));
    }

    #[test]
    fn patch_must_be_an_object() {
        assert!(patch_object(&serde_json::json!([1, 2])).is_err());
        assert!(patch_object(&serde_json::json!({"a": 1})).is_ok());
    }
}
