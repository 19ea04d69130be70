// [crates/windi-emitter/src/config.rs]
//! Emitter configuration: the per-installation identity and signing key.

use crate::error::{EmitterError, Result};

pub struct EmitterConfig {
    pub client_id: String,
    pub key_id: String,
    pub csalt: Vec<u8>,
    pub hmac_key: Vec<u8>,
}

impl EmitterConfig {
    pub fn new(client_id: impl Into<String>, key_id: impl Into<String>, csalt: Vec<u8>, hmac_key: Vec<u8>) -> Result<Self> {
        let client_id = client_id.into();
        let key_id = key_id.into();

        if client_id.is_empty() {
            return Err(EmitterError::Config("client_id must not be empty".to_string()));
        }
        if key_id.is_empty() {
            return Err(EmitterError::Config("key_id must not be empty".to_string()));
        }
        if hmac_key.is_empty() {
            return Err(EmitterError::Config("hmac_key must not be empty".to_string()));
        }

        Ok(EmitterConfig {
            client_id,
            key_id,
            csalt,
            hmac_key,
        })
    }
}
