// [crates/windi-common/src/wire.rs]
//! Wire-level Micro-Signal packet shape, shared verbatim by the emitter
//! (which builds it) and the bridge (which validates and decodes it).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireHeader {
    pub v: String,
    pub kid: String,
    pub cid: String,
    pub ts: i64,
    pub nonce: String,
    pub seq: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireCtx {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    #[serde(default)]
    pub flags: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePayload {
    pub shelf: String,
    pub code: String,
    pub weight: i64,
    pub event: String,
    pub domain_hash: String,
    pub doc_fingerprint: String,
    #[serde(default)]
    pub ctx: WireCtx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAuth {
    pub sig: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePacket {
    pub header: WireHeader,
    pub payload: WirePayload,
    pub auth: WireAuth,
}

/// The `{header, payload}` subset that gets canonicalized and signed —
/// `auth` itself is never part of the signed bytes.
#[derive(Debug, Clone, Serialize)]
pub struct SignedRegion<'a> {
    pub header: &'a WireHeader,
    pub payload: &'a WirePayload,
}
