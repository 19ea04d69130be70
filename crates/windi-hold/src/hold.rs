// [crates/windi-hold/src/hold.rs]
//! The Governance Hold: a time-boxed, authority-gated kill switch.

use serde::{Deserialize, Serialize};

use base64::{engine::general_purpose::STANDARD, Engine};
use windi_common::hashing::sha256_hex;
use windi_common::hmac_sign::hmac_sha256;
use windi_common::to_canonical_json;

/// Duration cap on a single hold, in hours.
pub const MAX_DURATION_HOURS: u32 = 72;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceHold {
    pub actor_hash: String,
    pub scope: String,
    pub reason_code: String,
    pub reason_signals: Vec<String>,
    pub timestamp: i64,
    pub hold_duration_hours: u32,
    pub release_actor_hash: Option<String>,
    pub release_timestamp: Option<i64>,
    pub signature: String,
}

/// Fields a hold's signature covers, excluding the signature itself and
/// the release fields (which get appended later, not re-signed).
#[derive(Serialize)]
struct SignedHoldRegion<'a> {
    actor_hash: &'a str,
    scope: &'a str,
    reason_code: &'a str,
    reason_signals: &'a [String],
    timestamp: i64,
    hold_duration_hours: u32,
}

impl GovernanceHold {
    pub fn build(
        hmac_key: &[u8],
        actor_sub: &str,
        scope: String,
        reason_code: String,
        reason_signals: Vec<String>,
        timestamp: i64,
        hold_duration_hours: u32,
    ) -> Self {
        let actor_hash = sha256_hex(actor_sub.as_bytes());

        let signed_region = SignedHoldRegion {
            actor_hash: &actor_hash,
            scope: &scope,
            reason_code: &reason_code,
            reason_signals: &reason_signals,
            timestamp,
            hold_duration_hours,
        };
        let signature = STANDARD.encode(hmac_sha256(hmac_key, &to_canonical_json(&signed_region)));

        GovernanceHold {
            actor_hash,
            scope,
            reason_code,
            reason_signals,
            timestamp,
            hold_duration_hours,
            release_actor_hash: None,
            release_timestamp: None,
            signature,
        }
    }

    /// A hold is active iff it has not been released and the duration
    /// window has not yet elapsed.
    pub fn is_active(&self, now: i64) -> bool {
        self.release_timestamp.is_none()
            && now < self.timestamp + self.hold_duration_hours as i64 * 60 * 60 * 1000
    }

    pub fn is_released(&self) -> bool {
        self.release_timestamp.is_some()
    }
}
