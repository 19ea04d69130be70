// [crates/windi-bridge/src/client_registry.rs]
//! Top-level registry of per-client anti-replay state. The registry lock
//! guards only lazy creation of a `ClientState`; the hot-path read/mutate
//! happens under that client's own lock once the `Arc` is in hand.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client_state::ClientState;

pub struct ClientRegistry {
    clients: Mutex<HashMap<String, Arc<ClientState>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        ClientRegistry {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the `cid`'s state, creating it (in production mode) on
    /// first sight.
    pub fn get_or_create(&self, cid: &str) -> Arc<ClientState> {
        let mut clients = self.clients.lock().expect("client registry lock poisoned");
        clients
            .entry(cid.to_string())
            .or_insert_with(|| Arc::new(ClientState::new(false)))
            .clone()
    }

    /// Registers (or re-registers) a client's state with an explicit
    /// simulation-mode flag, as `POST /api/v1/register` or an operator
    /// tool would. Never invoked from the telemetry ingestion path itself.
    pub fn set_simulation_mode(&self, cid: &str, simulation_mode: bool) {
        let mut clients = self.clients.lock().expect("client registry lock poisoned");
        clients.insert(cid.to_string(), Arc::new(ClientState::new(simulation_mode)));
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
