// [crates/windi-bridge/src/pipeline.rs]
//! The strict-order ingestion pipeline: schema, auth, anti-replay, decode.
//! Any step's failure rejects the packet; the caller is responsible for
//! counting the rejection against the aggregator's totals.

use base64::{engine::general_purpose::STANDARD, Engine};

use windi_common::hmac_sign::verify_hmac_sha256;
use windi_common::to_canonical_json;
use windi_common::wire::{SignedRegion, WirePacket};
use windi_registry::{Event, Shelf};

use crate::client_registry::ClientRegistry;
use crate::decoded::DecodedSignal;
use crate::error::{BridgeError, Result};
use crate::keyring::KeyRing;
use crate::schema::validate_schema;

/// Runs schema validation, signature verification, and anti-replay
/// admission, then decodes the packet against the registry. Does not
/// touch the aggregator — callers ingest the returned `DecodedSignal`
/// themselves, keeping this function free of aggregator-lock concerns.
pub fn validate_and_decode(
    packet: &WirePacket,
    keyring: &KeyRing,
    clients: &ClientRegistry,
    now: i64,
) -> Result<DecodedSignal> {
    validate_schema(packet)?;

    let key = keyring
        .lookup(&packet.header.kid)
        .ok_or_else(|| BridgeError::UnknownKey(packet.header.kid.clone()))?;

    let signed_bytes = to_canonical_json(&SignedRegion {
        header: &packet.header,
        payload: &packet.payload,
    });
    let received_sig = STANDARD
        .decode(&packet.auth.sig)
        .map_err(|_| BridgeError::HmacInvalid)?;
    if !verify_hmac_sha256(&key, &signed_bytes, &received_sig) {
        return Err(BridgeError::HmacInvalid);
    }

    let client_state = clients.get_or_create(&packet.header.cid);
    client_state.check_and_admit(now, packet.header.ts, &packet.header.nonce, packet.header.seq)?;

    let shelf = Shelf::parse(&packet.payload.shelf).expect("schema validation guarantees a valid shelf");
    let event = Event::parse(&packet.payload.event).expect("schema validation guarantees a valid event");

    let (signal_name, severity) = match windi_registry::lookup(&packet.payload.code) {
        Some(meta) => (meta.name.to_string(), meta.severity),
        None => (packet.payload.code.clone(), windi_registry::Severity::Unknown),
    };

    Ok(DecodedSignal::from_wire(packet, shelf, event, signal_name, severity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use windi_common::hmac_sign::hmac_sha256;
    use windi_common::nonce::generate_nonce_b64;
    use windi_common::wire::{WireAuth, WireCtx, WireHeader, WirePayload};

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn signed_packet(seq: u64, nonce: &str, ts: i64) -> WirePacket {
        let header = WireHeader {
            v: "1.0".to_string(),
            kid: "k1".to_string(),
            cid: "c1".to_string(),
            ts,
            nonce: nonce.to_string(),
            seq,
        };
        let payload = WirePayload {
            shelf: "S1".to_string(),
            code: "ID-CONC".to_string(),
            weight: 70,
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

    fn keyring() -> KeyRing {
        let kr = KeyRing::new();
        kr.register("k1", KEY.to_vec());
        kr
    }

    #[test]
    fn valid_fresh_packet_decodes() {
        let kr = keyring();
        let clients = ClientRegistry::new();
        let packet = signed_packet(1, &generate_nonce_b64(), 1_000);
        let decoded = validate_and_decode(&packet, &kr, &clients, 1_000).unwrap();
        assert_eq!(decoded.code, "ID-CONC");
        assert_eq!(decoded.signal_name, "Decisional Concentration");
    }

    #[test]
    fn resubmitting_the_same_packet_is_a_replay() {
        let kr = keyring();
        let clients = ClientRegistry::new();
        let packet = signed_packet(1, "fixed-nonce", 1_000);
        validate_and_decode(&packet, &kr, &clients, 1_000).unwrap();
        let err = validate_and_decode(&packet, &kr, &clients, 1_000).unwrap_err();
        assert!(matches!(err, BridgeError::NonceReuse(_)));
    }

    #[test]
    fn unknown_key_id_is_rejected() {
        let kr = KeyRing::new();
        let clients = ClientRegistry::new();
        let packet = signed_packet(1, "n1", 1_000);
        let err = validate_and_decode(&packet, &kr, &clients, 1_000).unwrap_err();
        assert_eq!(err, BridgeError::UnknownKey("k1".to_string()));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let kr = keyring();
        let clients = ClientRegistry::new();
        let mut packet = signed_packet(1, "n1", 1_000);
        packet.payload.weight = 99;
        let err = validate_and_decode(&packet, &kr, &clients, 1_000).unwrap_err();
        assert_eq!(err, BridgeError::HmacInvalid);
    }

    #[test]
    fn sequence_regression_beyond_grace_is_rejected() {
        let kr = keyring();
        let clients = ClientRegistry::new();
        let p1 = signed_packet(200, "n1", 1_000);
        validate_and_decode(&p1, &kr, &clients, 1_000).unwrap();
        let p2 = signed_packet(1, "n2", 1_000);
        let err = validate_and_decode(&p2, &kr, &clients, 1_000).unwrap_err();
        assert!(matches!(err, BridgeError::SeqRegression { .. }));
    }
}
