// [crates/windi-emitter/src/emitter.rs]
//! Builds and signs outbound Micro-Signal packets. Stateless per packet
//! besides the monotonic sequence counter and the client identity hash,
//! both computed once at construction.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::{engine::general_purpose::STANDARD, Engine};

use windi_common::{
    hashing::sha256_hex,
    hmac_sign::hmac_sha256,
    nonce::generate_nonce_b64,
    now_epoch_ms, to_canonical_json,
    wire::{SignedRegion, WireAuth, WireCtx, WireHeader, WirePacket, WirePayload},
};

use crate::config::EmitterConfig;
use crate::error::Result;
use crate::event::SignalEvent;

const PROTOCOL_VERSION: &str = "1.0";

pub struct EdgeEmitter {
    config: EmitterConfig,
    client_id_hash: String,
    seq: AtomicU64,
}

impl EdgeEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        let client_id_hash = sha256_hex(config.client_id.as_bytes());
        EdgeEmitter {
            config,
            client_id_hash,
            seq: AtomicU64::new(0),
        }
    }

    fn domain_hash(&self, domain_id: &str) -> String {
        let mut buf = self.config.csalt.clone();
        buf.extend_from_slice(domain_id.as_bytes());
        sha256_hex(buf)
    }

    fn doc_fingerprint(&self, doc_vector_bytes: &[u8]) -> String {
        let mut buf = self.config.csalt.clone();
        buf.extend_from_slice(doc_vector_bytes);
        sha256_hex(buf)
    }

    /// Builds, signs, and serializes one outbound packet. No retries on
    /// failure — buffering and retry policy belong to the caller.
    pub fn emit(&self, event: SignalEvent) -> Result<WirePacket> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);

        let header = WireHeader {
            v: PROTOCOL_VERSION.to_string(),
            kid: self.config.key_id.clone(),
            cid: self.client_id_hash.clone(),
            ts: event.ts.unwrap_or_else(now_epoch_ms),
            nonce: generate_nonce_b64(),
            seq,
        };

        let payload = WirePayload {
            shelf: event.shelf.as_str().to_string(),
            code: event.code,
            weight: event.weight,
            event: event.event.as_str().to_string(),
            domain_hash: self.domain_hash(&event.domain_id),
            doc_fingerprint: self.doc_fingerprint(&event.doc_vector_bytes),
            ctx: WireCtx {
                window: event.ctx_window,
                flags: event.ctx_flags,
            },
        };

        let signed_bytes = to_canonical_json(&SignedRegion {
            header: &header,
            payload: &payload,
        });
        let sig = hmac_sha256(&self.config.hmac_key, &signed_bytes);

        Ok(WirePacket {
            header,
            payload,
            auth: WireAuth {
                sig: STANDARD.encode(sig),
            },
        })
    }
}
