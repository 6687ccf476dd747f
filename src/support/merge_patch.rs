//! JSON merge-patch (RFC 7386) with a protected-path guard
//!
//! - `null` removes the target property
//! - an object merges into an existing object, otherwise replaces it
//! - anything else (scalars, arrays) replaces the target value wholesale
//!
//! Before a property is touched the guard is asked whether its path is
//! protected; a protected path aborts the merge regardless of the value.
//! Callers merge into a scratch copy, so an aborted merge leaves nothing
//! behind that anyone can observe.

use serde_json::{Map, Value};

/// Merge `patch` into `target`.
///
/// Returns the dotted path of the first protected property the patch
/// names, if any.
pub fn apply<F>(
    target: &mut Map<String, Value>,
    patch: &Map<String, Value>,
    is_protected: F,
) -> Result<(), String>
where
    F: Fn(&[&str]) -> bool,
{
    let mut path = Vec::new();
    merge_object(target, patch, &mut path, &is_protected)
}

fn merge_object<'p, F>(
    target: &mut Map<String, Value>,
    patch: &'p Map<String, Value>,
    path: &mut Vec<&'p str>,
    is_protected: &F,
) -> Result<(), String>
where
    F: Fn(&[&str]) -> bool,
{
    for (key, value) in patch {
        path.push(key.as_str());
        if is_protected(path.as_slice()) {
            return Err(path.join("."));
        }

        match value {
            Value::Null => {
                target.remove(key);
            }
            Value::Object(patch_object) => match target.get_mut(key) {
                Some(Value::Object(target_object)) => {
                    merge_object(target_object, patch_object, path, is_protected)?;
                }
                _ => {
                    let mut fresh = Map::new();
                    merge_object(&mut fresh, patch_object, path, is_protected)?;
                    target.insert(key.clone(), Value::Object(fresh));
                }
            },
            other => {
                target.insert(key.clone(), other.clone());
            }
        }

        path.pop();
    }
    Ok(())
}
