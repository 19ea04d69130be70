// [crates/windi-bridge/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI BRIDGE INGESTION (COMPONENT B)
 * CLASIFICACIÓN: TELEMETRY FRONT DOOR
 * RESPONSABILIDAD: SCHEMA, AUTH, ANTI-REPLAY, AGGREGATION
 *
 * Every packet that reaches the aggregator passed, in strict order:
 * schema validation, HMAC verification, and per-client anti-replay
 * admission. Any stage's failure rejects the packet — the aggregator
 * never sees a packet this pipeline did not fully clear.
 * =================================================================
 */

pub mod aggregator;
pub mod bridge;
pub mod client_registry;
pub mod client_state;
pub mod decoded;
pub mod error;
pub mod keyring;
pub mod pipeline;
pub mod schema;

pub use aggregator::{Aggregator, DashboardSnapshot, ShelfHealth, Totals};
pub use bridge::{BatchError, BatchOutcome, Bridge, IngestOutcome};
pub use decoded::DecodedSignal;
pub use error::{BridgeError, Result};
