// [crates/windi-bridge/src/error.rs]
//! Stable `PREFIX:DETAIL` rejection codes. Every rejection increments the
//! aggregator's `total_rejected` counter regardless of which stage raised it.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("SCHEMA:MISSING_FIELD {0}")]
    MissingField(String),

    #[error("SCHEMA:INVALID_SHELF {0}")]
    InvalidShelf(String),

    #[error("SCHEMA:INVALID_EVENT {0}")]
    InvalidEvent(String),

    #[error("SCHEMA:INVALID_WEIGHT {0}")]
    InvalidWeight(i64),

    #[error("SCHEMA:PROTOCOL_MISMATCH expected={expected} got={got}")]
    ProtocolMismatch { expected: String, got: String },

    #[error("AUTH:UNKNOWN_KEY kid={0}")]
    UnknownKey(String),

    #[error("AUTH:HMAC_INVALID")]
    HmacInvalid,

    #[error("REPLAY:TS_DRIFT drift_ms={0}")]
    TsDrift(i64),

    #[error("REPLAY:NONCE_REUSE nonce={0}")]
    NonceReuse(String),

    #[error("REPLAY:SEQ_REGRESSION seq={seq} last_seq={last_seq}")]
    SeqRegression { seq: u64, last_seq: u64 },
}

impl BridgeError {
    /// The stable wire-visible string, e.g. `REPLAY:NONCE_REUSE nonce=abcd…`.
    pub fn code(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
