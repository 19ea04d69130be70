// [crates/windi-common/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI COMMON STRATUM (V1.0)
 * CLASIFICACIÓN: SHARED KERNEL
 * RESPONSABILIDAD: CANONICAL JSON, HASHING, HMAC, RELOJ Y TELEMETRÍA
 *
 * Every module in the WINDI governance core that signs or hashes a
 * structure reaches for the same canonicalization here — two payloads
 * that are semantically equal must canonicalize to the same bytes
 * regardless of field insertion order.
 * =================================================================
 */

pub mod canonical;
pub mod clock;
pub mod hashing;
pub mod hmac_sign;
pub mod nonce;
pub mod telemetry;
pub mod wire;

pub use canonical::to_canonical_json;
pub use clock::now_epoch_ms;
pub use hashing::sha256_hex;
pub use hmac_sign::{hmac_sha256, verify_hmac_sha256};
pub use wire::{SignedRegion, WireAuth, WireCtx, WireHeader, WirePacket, WirePayload};
