// [crates/windi-common/src/hashing.rs]
//! SHA-256 helpers shared by the emitter, bridge, and provenance engine.

use sha2::{Digest, Sha256};

/// Returns the lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(sha256_bytes(data))
}

/// Returns the raw 32-byte SHA-256 digest of `data`.
pub fn sha256_bytes(data: impl AsRef<[u8]>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}

/// Hashes the concatenation of several byte slices without allocating an
/// intermediate joined buffer — used for the audit-chain's
/// `H(doc ⊕ action ⊕ actor ⊕ ts ⊕ previous_hash)` construction.
pub fn sha256_hex_concat(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn concat_matches_manual_join() {
        let joined = [b"a" as &[u8], b"b", b"c"].concat();
        assert_eq!(sha256_hex_concat(&[b"a", b"b", b"c"]), sha256_hex(&joined));
    }
}
