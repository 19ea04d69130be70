// [crates/windi-bridge/src/schema.rs]
//! Stage 1 of the ingestion pipeline: structural validation. Never touches
//! a lock or a key — pure function of the wire packet.

use windi_common::wire::WirePacket;
use windi_registry::{Event, Shelf};

use crate::error::{BridgeError, Result};

pub const PROTOCOL_VERSION: &str = "1.0";

pub fn validate_schema(packet: &WirePacket) -> Result<()> {
    let header = &packet.header;
    let payload = &packet.payload;

    if header.v != PROTOCOL_VERSION {
        return Err(BridgeError::ProtocolMismatch {
            expected: PROTOCOL_VERSION.to_string(),
            got: header.v.clone(),
        });
    }
    if header.kid.is_empty() {
        return Err(BridgeError::MissingField("header.kid".to_string()));
    }
    if header.cid.is_empty() {
        return Err(BridgeError::MissingField("header.cid".to_string()));
    }
    if header.nonce.is_empty() {
        return Err(BridgeError::MissingField("header.nonce".to_string()));
    }

    if Shelf::parse(&payload.shelf).is_none() {
        return Err(BridgeError::InvalidShelf(payload.shelf.clone()));
    }
    if Event::parse(&payload.event).is_none() {
        return Err(BridgeError::InvalidEvent(payload.event.clone()));
    }
    if !(0..=100).contains(&payload.weight) {
        return Err(BridgeError::InvalidWeight(payload.weight));
    }
    if payload.code.is_empty() {
        return Err(BridgeError::MissingField("payload.code".to_string()));
    }
    if payload.domain_hash.is_empty() {
        return Err(BridgeError::MissingField("payload.domain_hash".to_string()));
    }
    if payload.doc_fingerprint.is_empty() {
        return Err(BridgeError::MissingField("payload.doc_fingerprint".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use windi_common::wire::{WireAuth, WireCtx, WireHeader, WirePayload};

    fn packet(weight: i64, shelf: &str, event: &str) -> WirePacket {
        WirePacket {
            header: WireHeader {
                v: PROTOCOL_VERSION.to_string(),
                kid: "k1".to_string(),
                cid: "c1".to_string(),
                ts: 0,
                nonce: "n1".to_string(),
                seq: 1,
            },
            payload: WirePayload {
                shelf: shelf.to_string(),
                code: "ID-CONC".to_string(),
                weight,
                event: event.to_string(),
                domain_hash: "dh".to_string(),
                doc_fingerprint: "df".to_string(),
                ctx: WireCtx::default(),
            },
            auth: WireAuth { sig: "sig".to_string() },
        }
    }

    #[test]
    fn weight_zero_and_hundred_accepted() {
        assert!(validate_schema(&packet(0, "S1", "APPROVED")).is_ok());
        assert!(validate_schema(&packet(100, "S1", "APPROVED")).is_ok());
    }

    #[test]
    fn weight_out_of_range_rejected() {
        assert!(matches!(
            validate_schema(&packet(-1, "S1", "APPROVED")),
            Err(BridgeError::InvalidWeight(-1))
        ));
        assert!(matches!(
            validate_schema(&packet(101, "S1", "APPROVED")),
            Err(BridgeError::InvalidWeight(101))
        ));
    }

    #[test]
    fn unknown_shelf_rejected() {
        assert!(matches!(
            validate_schema(&packet(10, "S9", "APPROVED")),
            Err(BridgeError::InvalidShelf(_))
        ));
    }

    #[test]
    fn unknown_event_rejected() {
        assert!(matches!(
            validate_schema(&packet(10, "S1", "NOT_AN_EVENT")),
            Err(BridgeError::InvalidEvent(_))
        ));
    }
}
