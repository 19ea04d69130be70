// [crates/windi-hold/src/manager.rs]
//! Governance Hold Protocol: one lock guards the append-only hold list for
//! the whole process lifetime. Holds are never deleted — release only
//! annotates an existing entry.

use std::sync::Mutex;

use windi_common::now_epoch_ms;
use windi_virtue_token::VirtueToken;

use crate::error::{HoldError, Result};
use crate::hold::{GovernanceHold, MAX_DURATION_HOURS};

pub struct HoldManager {
    hmac_key: Vec<u8>,
    holds: Mutex<Vec<GovernanceHold>>,
}

impl HoldManager {
    pub fn new(hmac_key: Vec<u8>) -> Self {
        HoldManager {
            hmac_key,
            holds: Mutex::new(Vec::new()),
        }
    }

    /// Requires `token.kill_switch_authority && token.s_level >= 2`.
    pub fn activate(
        &self,
        token: &VirtueToken,
        scope: String,
        reason_code: String,
        reason_signals: Vec<String>,
        duration_hours: u32,
    ) -> Result<GovernanceHold> {
        if !token.kill_switch_authority || token.s_level < 2 {
            return Err(HoldError::Unauthorized);
        }
        if duration_hours > MAX_DURATION_HOURS {
            return Err(HoldError::DurationExceeded(duration_hours));
        }

        let hold = GovernanceHold::build(
            &self.hmac_key,
            &token.sub,
            scope,
            reason_code,
            reason_signals,
            now_epoch_ms(),
            duration_hours,
        );

        self.holds.lock().expect("hold list lock poisoned").push(hold.clone());
        Ok(hold)
    }

    /// Requires `token.s_level >= 2`. `index` is the position in
    /// `hold_history()`'s order (insertion order).
    pub fn release(&self, token: &VirtueToken, index: usize) -> Result<GovernanceHold> {
        if token.s_level < 2 {
            return Err(HoldError::ReleaseUnauthorized);
        }

        let mut holds = self.holds.lock().expect("hold list lock poisoned");
        if holds.is_empty() {
            return Err(HoldError::NoActiveHolds);
        }

        let hold = holds.get_mut(index).ok_or(HoldError::NoActiveHolds)?;
        if hold.is_released() {
            return Err(HoldError::AlreadyReleased);
        }

        hold.release_actor_hash = Some(windi_common::hashing::sha256_hex(token.sub.as_bytes()));
        hold.release_timestamp = Some(now_epoch_ms());
        Ok(hold.clone())
    }

    /// All holds for which `is_active()` is currently true.
    pub fn active_holds(&self) -> Vec<GovernanceHold> {
        let now = now_epoch_ms();
        self.holds
            .lock()
            .expect("hold list lock poisoned")
            .iter()
            .filter(|h| h.is_active(now))
            .cloned()
            .collect()
    }

    /// All holds, released or not — the Guard's `ReportBuilder` reads this
    /// append-only forensic view.
    pub fn hold_history(&self) -> Vec<GovernanceHold> {
        self.holds.lock().expect("hold list lock poisoned").clone()
    }
}
