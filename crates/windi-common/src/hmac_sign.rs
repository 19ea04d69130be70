// [crates/windi-common/src/hmac_sign.rs]
//! HMAC-SHA256 signing and constant-time verification.
//!
//! Used by the emitter (signing outbound packets), the bridge (verifying
//! them), and the virtue-token issuer (signing/validating tokens).

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes `HMAC-SHA256(key, msg)`.
pub fn hmac_sha256(key: &[u8], msg: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison of an expected and received MAC. Always
/// compares the full length of `expected` even on early byte mismatches —
/// `subtle::ConstantTimeEq` does the timing-safe work.
pub fn verify_hmac_sha256(key: &[u8], msg: &[u8], received: &[u8]) -> bool {
    let expected = hmac_sha256(key, msg);
    expected.ct_eq(received).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_and_message_signs_identically() {
        let key = b"a-shared-secret";
        let msg = b"header+payload bytes";
        assert_eq!(hmac_sha256(key, msg), hmac_sha256(key, msg));
    }

    #[test]
    fn flipping_a_byte_invalidates_the_signature() {
        let key = b"a-shared-secret";
        let sig = hmac_sha256(key, b"original message");
        assert!(!verify_hmac_sha256(key, b"original Message", &sig));
    }

    #[test]
    fn verify_accepts_matching_signature() {
        let key = b"a-shared-secret";
        let msg = b"packet bytes";
        let sig = hmac_sha256(key, msg);
        assert!(verify_hmac_sha256(key, msg, &sig));
    }
}
