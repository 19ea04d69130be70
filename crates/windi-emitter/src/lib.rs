// [crates/windi-emitter/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI EDGE EMITTER (COMPONENT A)
 * CLASIFICACIÓN: TELEMETRY ORIGIN
 * RESPONSABILIDAD: SIGN, STAMP, AND SERIALIZE OUTBOUND MICRO-SIGNALS
 *
 * Stateless per packet. The only state carried across calls is the
 * monotonic sequence counter and the once-computed client identity hash.
 * =================================================================
 */

pub mod config;
pub mod emitter;
pub mod error;
pub mod event;

pub use config::EmitterConfig;
pub use emitter::EdgeEmitter;
pub use error::{EmitterError, Result};
pub use event::SignalEvent;
