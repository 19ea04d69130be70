// [crates/windi-bridge/src/bridge.rs]
//! The Bridge: the composition root for ingestion, registration, and
//! dashboard reads. One instance per process, shared behind an `Arc` with
//! the HTTP handlers that wrap it.

use serde::Serialize;

use windi_common::now_epoch_ms;
use windi_registry::Shelf;

use crate::aggregator::{Aggregator, DashboardSnapshot};
use crate::client_registry::ClientRegistry;
use crate::decoded::DecodedSignal;
use crate::error::BridgeError;
use crate::keyring::KeyRing;
use crate::pipeline::validate_and_decode;

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub accepted: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub accepted: u64,
    pub rejected: u64,
    pub errors: Vec<BatchError>,
}

pub struct Bridge {
    keyring: KeyRing,
    clients: ClientRegistry,
    aggregator: Aggregator,
}

impl Bridge {
    pub fn new() -> Self {
        Bridge {
            keyring: KeyRing::new(),
            clients: ClientRegistry::new(),
            aggregator: Aggregator::new(),
        }
    }

    /// Backs `POST /api/v1/register`: registers an HMAC key for a `kid`.
    pub fn register_client(&self, kid: impl Into<String>, key: Vec<u8>) {
        self.keyring.register(kid, key);
    }

    /// Flags a client's replay window into (or out of) simulation mode —
    /// an explicit, operator-scoped action, never part of the telemetry
    /// ingestion path itself.
    pub fn set_simulation_mode(&self, cid: &str, simulation_mode: bool) {
        self.clients.set_simulation_mode(cid, simulation_mode);
    }

    fn ingest_one(&self, packet: &windi_common::wire::WirePacket) -> Result<(), BridgeError> {
        let now = now_epoch_ms();
        match validate_and_decode(packet, &self.keyring, &self.clients, now) {
            Ok(decoded) => {
                self.aggregator.ingest(decoded);
                Ok(())
            }
            Err(err) => {
                self.aggregator.record_rejected();
                Err(err)
            }
        }
    }

    /// Backs `POST /api/v1/telemetry`.
    pub fn ingest(&self, packet: &windi_common::wire::WirePacket) -> IngestOutcome {
        match self.ingest_one(packet) {
            Ok(()) => IngestOutcome {
                accepted: true,
                message: "OK: signal accepted".to_string(),
            },
            Err(err) => IngestOutcome {
                accepted: false,
                message: err.code(),
            },
        }
    }

    /// Backs `POST /api/v1/telemetry/batch`.
    pub fn ingest_batch(&self, packets: &[windi_common::wire::WirePacket]) -> BatchOutcome {
        let mut accepted = 0u64;
        let mut errors = Vec::new();

        for (index, packet) in packets.iter().enumerate() {
            match self.ingest_one(packet) {
                Ok(()) => accepted += 1,
                Err(err) => errors.push(BatchError {
                    index,
                    reason: err.code(),
                }),
            }
        }

        BatchOutcome {
            accepted,
            rejected: errors.len() as u64,
            errors,
        }
    }

    /// Backs `GET /api/v1/shelf/{S1..S7}`.
    pub fn shelf_detail(&self, shelf: Shelf, limit: usize) -> Vec<DecodedSignal> {
        self.aggregator.shelf_detail(shelf, limit)
    }

    /// Backs `GET /api/v1/dashboard`. Unfiltered — the `windi-virtue-token`
    /// crate's `SignalFilter` runs over this before anything is serialized
    /// to a caller.
    pub fn dashboard(&self) -> DashboardSnapshot {
        self.aggregator.snapshot()
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use windi_common::hmac_sign::hmac_sha256;
    use windi_common::to_canonical_json;
    use windi_common::wire::{SignedRegion, WireAuth, WireCtx, WireHeader, WirePacket, WirePayload};

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn packet(cid: &str, seq: u64, nonce: &str, weight: i64) -> WirePacket {
        let header = WireHeader {
            v: "1.0".to_string(),
            kid: "k1".to_string(),
            cid: cid.to_string(),
            ts: windi_common::now_epoch_ms(),
            nonce: nonce.to_string(),
            seq,
        };
        let payload = WirePayload {
            shelf: "S1".to_string(),
            code: "ID-CONC".to_string(),
            weight,
            event: "APPROVED".to_string(),
            domain_hash: "dh".to_string(),
            doc_fingerprint: "df".to_string(),
            ctx: WireCtx::default(),
        };
        let bytes = to_canonical_json(&SignedRegion {
            header: &header,
            payload: &payload,
        });
        let sig = hmac_sha256(KEY, &bytes);
        WirePacket {
            header,
            payload,
            auth: WireAuth {
                sig: STANDARD.encode(sig),
            },
        }
    }

    #[test]
    fn happy_path_ingest_updates_dashboard() {
        let bridge = Bridge::new();
        bridge.register_client("k1", KEY.to_vec());

        let outcome = bridge.ingest(&packet("c1", 1, "n1", 70));
        assert!(outcome.accepted);

        let dash = bridge.dashboard();
        assert_eq!(dash.totals.received, 1);
        assert_eq!(dash.by_shelf.get("S1"), Some(&1));
        assert_eq!(dash.shelf_health["S1"].status, "warning");
    }

    #[test]
    fn replay_rejection_is_counted() {
        let bridge = Bridge::new();
        bridge.register_client("k1", KEY.to_vec());
        let p = packet("c1", 1, "n1", 50);

        assert!(bridge.ingest(&p).accepted);
        let replay = bridge.ingest(&p);
        assert!(!replay.accepted);
        assert!(replay.message.starts_with("REPLAY:NONCE_REUSE"));
        assert_eq!(bridge.dashboard().totals.rejected, 1);
    }

    #[test]
    fn batch_reports_index_and_reason_for_each_rejection() {
        let bridge = Bridge::new();
        bridge.register_client("k1", KEY.to_vec());
        let good = packet("c1", 1, "n1", 40);
        let bad = packet("c1", 1, "n1", 40); // duplicate nonce+seq -> replay

        let outcome = bridge.ingest_batch(&[good, bad]);
        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.errors[0].index, 1);
        assert!(outcome.errors[0].reason.starts_with("REPLAY:"));
    }

    #[test]
    fn shelf_detail_returns_ingested_signals_for_that_shelf() {
        let bridge = Bridge::new();
        bridge.register_client("k1", KEY.to_vec());
        bridge.ingest(&packet("c1", 1, "n1", 60));
        let signals = bridge.shelf_detail(Shelf::S1, 10);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].code, "ID-CONC");
    }
}
