//! Wire helpers shared by the OCPI records

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Serialize a record into a JSON object (empty object if it is not one).
pub fn to_json_object<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value).unwrap_or_default() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Rebuild a JSON value with every object's keys in sorted order, so the
/// output does not depend on how `serde_json::Map` happens to be backed.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Serialize a keyed child collection as a JSON array ordered by key.
pub fn map_values<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(map.len()))?;
    for value in map.values() {
        seq.serialize_element(value)?;
    }
    seq.end()
}

/// Coordinates use a `.` decimal separator and 5–7 fractional digits.
pub fn format_coordinate(value: &Decimal) -> String {
    let mut rounded = value.round_dp(7).normalize();
    if rounded.scale() < 5 {
        rounded.rescale(5);
    }
    rounded.to_string()
}

pub fn parse_coordinate(text: &str) -> Result<Decimal, String> {
    let normalized = text.trim().replace(',', ".");
    Decimal::from_str(&normalized).map_err(|e| format!("'{}': {}", text, e))
}

/// `#[serde(with = "coordinate")]`: written as a string, read from a
/// string or a number.
pub mod coordinate {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCoordinate {
        Text(String),
        Number(f64),
    }

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_coordinate(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let text = match RawCoordinate::deserialize(deserializer)? {
            RawCoordinate::Text(text) => text,
            RawCoordinate::Number(number) => number.to_string(),
        };
        super::parse_coordinate(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coordinates_have_five_to_seven_digits() {
        assert_eq!(format_coordinate(&Decimal::from_str("51.0475600").unwrap()), "51.04756");
        assert_eq!(format_coordinate(&Decimal::from_str("4.5").unwrap()), "4.50000");
        assert_eq!(
            format_coordinate(&Decimal::from_str("-3.123456789").unwrap()),
            "-3.1234568"
        );
    }

    #[test]
    fn coordinates_accept_comma_separator() {
        assert_eq!(parse_coordinate(" 51,04756 ").unwrap(), Decimal::from_str("51.04756").unwrap());
        assert!(parse_coordinate("north").is_err());
    }

    #[test]
    fn canonicalize_sorts_nested_keys() {
        let value = json!({"b": 1, "a": {"z": true, "m": [ {"y": 1, "x": 2} ]}});
        let text = canonicalize(&value).to_string();
        assert_eq!(text, r#"{"a":{"m":[{"x":2,"y":1}],"z":true},"b":1}"#);
    }
}
