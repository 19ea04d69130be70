// [crates/windi-emitter/src/event.rs]
//! The shape an application describes a governance event in, before the
//! emitter builds and signs a wire packet for it.

use windi_registry::{Event, Shelf};

#[derive(Debug, Clone)]
pub struct SignalEvent {
    pub shelf: Shelf,
    pub code: String,
    pub weight: i64,
    pub domain_id: String,
    pub doc_vector_bytes: Vec<u8>,
    pub event: Event,
    pub ctx_window: Option<String>,
    pub ctx_flags: u32,
    /// Epoch-ms override, used only by tests and replay fixtures. `None`
    /// defaults to the emitter's wall clock at build time.
    pub ts: Option<i64>,
}
