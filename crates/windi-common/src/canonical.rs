// [crates/windi-common/src/canonical.rs]
//! Canonical JSON encoding: UTF-8, sorted keys, minimal separators.
//!
//! Anything that gets signed or structurally hashed in WINDI goes through
//! here first. `serde_json::Value`'s `Map` is backed by a `BTreeMap` when
//! the `preserve_order` feature is off (the default we use), so re-parsing
//! into `Value` and re-serializing without pretty-printing already yields
//! sorted keys and `(",", ":")` separators.

use serde::Serialize;
use serde_json::Value;

/// Serializes `value` to canonical JSON bytes: sorted keys, no whitespace.
///
/// Panics only if `value` cannot be represented as JSON at all (e.g. a
/// `HashMap` with non-string keys) — callers pass well-formed wire/payload
/// structs, so this is treated as a programmer error, not a runtime one.
pub fn to_canonical_json<T: Serialize>(value: &T) -> Vec<u8> {
    let as_value: Value =
        serde_json::to_value(value).expect("windi_common: value must be JSON-representable");
    serde_json::to_vec(&as_value).expect("windi_common: canonical re-serialization cannot fail")
}

/// Same as [`to_canonical_json`] but returns a `String`.
pub fn to_canonical_json_string<T: Serialize>(value: &T) -> String {
    String::from_utf8(to_canonical_json(value)).expect("canonical JSON is always valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_and_strips_whitespace() {
        let v = json!({"b": 1, "a": {"d": 2, "c": 3}});
        let out = to_canonical_json_string(&v);
        assert_eq!(out, r#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[test]
    fn semantically_equal_structs_canonicalize_identically() {
        #[derive(serde::Serialize)]
        struct A {
            z: u32,
            a: u32,
        }
        let one = A { z: 1, a: 2 };
        let two = A { a: 2, z: 1 };
        assert_eq!(to_canonical_json(&one), to_canonical_json(&two));
    }
}
