// [crates/windi-provenance/src/hash.rs]
//! Structural hashing: content-addressed hashes of a governance decision,
//! independent of field insertion order or incidental whitespace.

use serde::Serialize;
use serde_json::{json, Value};
use windi_common::hashing::sha256_hex;

/// `SHA256(canonical_json(payload))`. Deterministic: semantically-equal
/// payloads (same keys/values, any insertion order) hash identically.
pub fn compute_structural_hash<T: Serialize>(payload: &T) -> String {
    let bytes = windi_common::to_canonical_json(payload);
    sha256_hex(bytes)
}

/// Binds a document's content to its metadata for tamper-evidence that
/// survives a provenance record being separated from the document itself.
pub fn compute_content_structural_hash(content: &str, metadata: &Value) -> String {
    let binding = json!({
        "content": content,
        "metadata": metadata,
    });
    compute_structural_hash(&binding)
}
