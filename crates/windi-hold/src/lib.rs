// [crates/windi-hold/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI GOVERNANCE HOLD PROTOCOL (COMPONENT D)
 * CLASIFICACIÓN: EMERGENCY CONTROL LAYER
 * RESPONSABILIDAD: TIME-BOXED KILL SWITCH, DUAL-ACTOR RELEASE
 *
 * A hold record is append-only and HMAC-signed at activation; release
 * never rewrites the signed region, it only annotates release_actor_hash
 * and release_timestamp onto the existing entry.
 * =================================================================
 */

pub mod error;
pub mod hold;
pub mod manager;

pub use error::{HoldError, Result};
pub use hold::{GovernanceHold, MAX_DURATION_HOURS};
pub use manager::HoldManager;
