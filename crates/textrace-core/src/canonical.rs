//! # Canonical Serialization — JCS Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes used in
//! digest computation.
//!
//! ## Integrity Invariant
//!
//! A block hash is only meaningful if recomputing it from the stored fields
//! reproduces the same bytes every time. `CanonicalBytes` has a private inner
//! field and a single constructor that:
//!
//! 1. **Rejects floats**: their textual form is not stable across encoders.
//! 2. **Serializes with RFC 8785 (JCS)** via `serde_jcs`: lexicographically
//!    sorted object keys, compact separators, no insignificant whitespace.
//!
//! Struct field declaration order therefore has no influence on the digest.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - All numbers are integers.
/// - Object keys are sorted and separators are compact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float. Returns `CanonicalizationError::SerializationFailed` if the
    /// value cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk the value tree and fail on the first non-integer number.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_str(value: &Value) -> String {
        let cb = CanonicalBytes::new(value).expect("should canonicalize");
        String::from_utf8(cb.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn keys_are_sorted() {
        let data = serde_json::json!({"previousHash": "0", "index": 0, "nonce": 0});
        assert_eq!(
            canonical_str(&data),
            r#"{"index":0,"nonce":0,"previousHash":"0"}"#
        );
    }

    #[test]
    fn nested_objects_sorted() {
        let data = serde_json::json!({
            "transaction": {"type": "ARCHIVE_BATCH", "batchId": "COT-001"},
            "index": 3
        });
        assert_eq!(
            canonical_str(&data),
            r#"{"index":3,"transaction":{"batchId":"COT-001","type":"ARCHIVE_BATCH"}}"#
        );
    }

    #[test]
    fn struct_field_order_is_irrelevant() {
        #[derive(Serialize)]
        struct Ab {
            a: u32,
            b: u32,
        }
        #[derive(Serialize)]
        struct Ba {
            b: u32,
            a: u32,
        }
        let x = CanonicalBytes::new(&Ab { a: 1, b: 2 }).unwrap();
        let y = CanonicalBytes::new(&Ba { b: 2, a: 1 }).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn float_rejected() {
        let data = serde_json::json!({"weightKg": 12.5});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 12.5),
            other => panic!("expected FloatRejected, got: {other:?}"),
        }
    }

    #[test]
    fn deeply_nested_float_rejected() {
        let data = serde_json::json!({"a": [{"b": {"c": 0.25}}]});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn integers_and_null_pass_through() {
        let data = serde_json::json!({"n": -42, "big": 9999999999i64, "none": null});
        assert_eq!(
            canonical_str(&data),
            r#"{"big":9999999999,"n":-42,"none":null}"#
        );
    }

    #[test]
    fn unicode_is_not_escaped() {
        let data = serde_json::json!({"location": "Multan, Pañjab"});
        assert!(canonical_str(&data).contains("Pañjab"));
    }

    #[test]
    fn len_and_is_empty() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert_eq!(cb.len(), 2);
        assert!(!cb.is_empty());
    }
}
