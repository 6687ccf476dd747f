//! Content-addressed ETags

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::serializations::canonicalize;

/// The exact text that is hashed: compact JSON with sorted keys.
pub fn canonical_json(json: &Map<String, Value>) -> String {
    canonicalize(&Value::Object(json.clone())).to_string()
}

/// base64(SHA-256(UTF-8(canonical JSON)))
pub fn content_hash(json: &Map<String, Value>) -> String {
    let digest = Sha256::digest(canonical_json(json).as_bytes());
    STANDARD.encode(digest)
}
