// [crates/windi-bridge/src/client_state.rs]
//! Per-client anti-replay state: one lock per `cid`, created lazily under
//! the registry's top-level lock (the registry lock only guards insertion
//! of a new `Arc<ClientState>`; the hot-path mutation happens under the
//! per-client lock alone).

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use crate::error::{BridgeError, Result};

/// Sequence-regression tolerance: a packet whose `seq` falls within this
/// many slots behind `last_seq` is still accepted, absorbing small-batch
/// reordering from the emitter side.
pub const GRACE: u64 = 50;

/// Bounded nonce window per client. The (W+1)-th nonce evicts the oldest,
/// which becomes re-admissible.
pub const NONCE_WINDOW: usize = 10_000;

/// Production clock-drift tolerance: five minutes.
pub const MAX_DRIFT_MS_PRODUCTION: i64 = 5 * 60 * 1000;

/// Simulation clock-drift tolerance: one year. Only active when a client
/// has been explicitly flagged into simulation mode at registration time —
/// never mutable by a request the client itself sends.
pub const MAX_DRIFT_MS_SIMULATION: i64 = 365 * 24 * 60 * 60 * 1000;

struct ReplayWindow {
    last_seq: u64,
    seen: HashSet<String>,
    order: VecDeque<String>,
}

impl ReplayWindow {
    fn new() -> Self {
        ReplayWindow {
            last_seq: 0,
            seen: HashSet::new(),
            order: VecDeque::new(),
        }
    }

    fn contains(&self, nonce: &str) -> bool {
        self.seen.contains(nonce)
    }

    fn admit(&mut self, nonce: String, seq: u64) {
        self.last_seq = self.last_seq.max(seq);
        self.seen.insert(nonce.clone());
        self.order.push_back(nonce);
        if self.order.len() > NONCE_WINDOW {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
    }
}

/// Per-client anti-replay state. `simulation_mode` is set once, at
/// registration, and never toggled by an inbound telemetry packet.
pub struct ClientState {
    window: Mutex<ReplayWindow>,
    simulation_mode: bool,
}

impl ClientState {
    pub fn new(simulation_mode: bool) -> Self {
        ClientState {
            window: Mutex::new(ReplayWindow::new()),
            simulation_mode,
        }
    }

    pub fn max_drift_ms(&self) -> i64 {
        if self.simulation_mode {
            MAX_DRIFT_MS_SIMULATION
        } else {
            MAX_DRIFT_MS_PRODUCTION
        }
    }

    pub fn simulation_mode(&self) -> bool {
        self.simulation_mode
    }

    pub fn last_seq(&self) -> u64 {
        self.window.lock().expect("client replay window lock poisoned").last_seq
    }

    /// Runs the anti-replay check-and-admit under a single critical
    /// section: drift, nonce-reuse, and seq-regression are all evaluated
    /// against the same snapshot of `last_seq`/`seen` that the admit then
    /// mutates, closing the race a check-then-admit split would leave open.
    pub fn check_and_admit(&self, now: i64, ts: i64, nonce: &str, seq: u64) -> Result<()> {
        let drift = (now - ts).abs();
        if drift > self.max_drift_ms() {
            return Err(BridgeError::TsDrift(drift));
        }

        let mut window = self.window.lock().expect("client replay window lock poisoned");

        if window.contains(nonce) {
            return Err(BridgeError::NonceReuse(nonce.to_string()));
        }

        if window.last_seq >= GRACE && seq <= window.last_seq - GRACE {
            return Err(BridgeError::SeqRegression {
                seq,
                last_seq: window.last_seq,
            });
        }

        window.admit(nonce.to_string(), seq);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_nonce_and_increasing_seq_is_admitted() {
        let state = ClientState::new(false);
        assert!(state.check_and_admit(1_000, 1_000, "n1", 1).is_ok());
        assert!(state.check_and_admit(1_000, 1_000, "n2", 2).is_ok());
    }

    #[test]
    fn reused_nonce_is_rejected() {
        let state = ClientState::new(false);
        state.check_and_admit(1_000, 1_000, "n1", 1).unwrap();
        let err = state.check_and_admit(1_000, 1_000, "n1", 2).unwrap_err();
        assert_eq!(err, BridgeError::NonceReuse("n1".to_string()));
    }

    #[test]
    fn seq_within_grace_is_admitted_but_grace_minus_one_is_not() {
        let state = ClientState::new(false);
        state.check_and_admit(1_000, 1_000, "n0", 100).unwrap();
        // last_seq - GRACE + 1 accepted
        assert!(state.check_and_admit(1_000, 1_000, "n1", 100 - GRACE + 1).is_ok());
        // last_seq - GRACE rejected (seq <= last_seq - GRACE)
        let err = state.check_and_admit(1_000, 1_000, "n2", 100 - GRACE).unwrap_err();
        assert!(matches!(err, BridgeError::SeqRegression { .. }));
    }

    #[test]
    fn drift_at_boundary_is_accepted_one_past_is_not() {
        let state = ClientState::new(false);
        assert!(state.check_and_admit(MAX_DRIFT_MS_PRODUCTION, 0, "n1", 1).is_ok());
        let state2 = ClientState::new(false);
        let err = state2
            .check_and_admit(MAX_DRIFT_MS_PRODUCTION + 1, 0, "n1", 1)
            .unwrap_err();
        assert!(matches!(err, BridgeError::TsDrift(_)));
    }

    #[test]
    fn simulation_mode_tolerates_huge_drift() {
        let state = ClientState::new(true);
        assert!(state.check_and_admit(MAX_DRIFT_MS_PRODUCTION * 100, 0, "n1", 1).is_ok());
    }

    #[test]
    fn window_plus_one_nonce_evicts_the_first() {
        let state = ClientState::new(false);
        for i in 0..NONCE_WINDOW {
            state
                .check_and_admit(1_000, 1_000, &format!("n{i}"), i as u64 + 1)
                .unwrap();
        }
        // n0 has been evicted, so it's re-admissible despite being "seen" before.
        assert!(state
            .check_and_admit(1_000, 1_000, "n0", NONCE_WINDOW as u64 + 1)
            .is_ok());
    }
}
