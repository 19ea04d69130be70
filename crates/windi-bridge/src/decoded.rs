// [crates/windi-bridge/src/decoded.rs]
//! The ingested form of a Micro-Signal: wire fields plus registry lookups.

use serde::{Deserialize, Serialize};

use windi_common::wire::WirePacket;
use windi_registry::{Event, Severity, Shelf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedSignal {
    pub client_id_hash: String,
    pub kid: String,
    pub ts: i64,
    pub seq: u64,
    pub shelf: Shelf,
    pub code: String,
    pub weight: i64,
    pub event: Event,
    pub domain_hash: String,
    pub doc_fingerprint: String,
    pub signal_name: String,
    pub severity: Severity,
}

impl DecodedSignal {
    pub fn from_wire(packet: &WirePacket, shelf: Shelf, event: Event, signal_name: String, severity: Severity) -> Self {
        DecodedSignal {
            client_id_hash: packet.header.cid.clone(),
            kid: packet.header.kid.clone(),
            ts: packet.header.ts,
            seq: packet.header.seq,
            shelf,
            code: packet.payload.code.clone(),
            weight: packet.payload.weight,
            event,
            domain_hash: packet.payload.domain_hash.clone(),
            doc_fingerprint: packet.payload.doc_fingerprint.clone(),
            signal_name,
            severity,
        }
    }
}
