// [crates/windi-bridge/src/keyring.rs]
//! HMAC key registry: `kid -> key bytes`, populated by `POST /api/v1/register`.

use std::collections::HashMap;
use std::sync::RwLock;

/// Reads vastly outnumber writes (every ingest looks up a key; keys are
/// registered rarely), so an `RwLock` over a plain map is enough — no need
/// for per-key locking the way `ClientState` needs per-`cid` locking.
pub struct KeyRing {
    keys: RwLock<HashMap<String, Vec<u8>>>,
}

impl KeyRing {
    pub fn new() -> Self {
        KeyRing {
            keys: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, kid: impl Into<String>, key: Vec<u8>) {
        self.keys
            .write()
            .expect("keyring lock poisoned")
            .insert(kid.into(), key);
    }

    pub fn lookup(&self, kid: &str) -> Option<Vec<u8>> {
        self.keys.read().expect("keyring lock poisoned").get(kid).cloned()
    }
}

impl Default for KeyRing {
    fn default() -> Self {
        Self::new()
    }
}
