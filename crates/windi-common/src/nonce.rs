// [crates/windi-common/src/nonce.rs]
//! 128-bit nonce generation for outbound packets and token issuance.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;

/// Generates a fresh 128-bit nonce, base64-encoded for the wire.
pub fn generate_nonce_b64() -> String {
    let mut buf = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut buf);
    STANDARD.encode(buf)
}
