//! Canonical serialization shared by every hash preimage and signed message:
//! a JSON object with lexicographically sorted keys, UTF-8, no insignificant
//! whitespace. `serde_json::Value`'s `Object` is `BTreeMap`-backed, so routing
//! a serializable value through `to_value` before `to_string` is sufficient to
//! get sorted keys without a custom serializer.

use crate::error::CryptoError;
use crate::hash::Hash256;
use serde::Serialize;

/// Serializes `value` to its canonical byte encoding.
///
/// # Errors
/// Returns an error if `value` cannot be represented as a JSON value.
pub fn canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CryptoError> {
    let as_value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&as_value)?.into_bytes())
}

/// Hashes the canonical encoding of `value` with SHA-256.
///
/// # Errors
/// Returns an error if `value` cannot be canonicalized.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<Hash256, CryptoError> {
    Ok(Hash256::sha256(&canonical_bytes(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_lexicographically() {
        let value = json!({"b": 1, "a": 2, "c": 3});
        let bytes = canonical_bytes(&value).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"a":2,"b":1,"c":3}"#);
    }

    #[test]
    fn hash_is_order_independent_of_field_declaration() {
        let a = json!({"x": 1, "y": 2});
        let b = json!({"y": 2, "x": 1});
        assert_eq!(canonical_hash(&a).unwrap(), canonical_hash(&b).unwrap());
    }
}
