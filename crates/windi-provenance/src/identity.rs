// [crates/windi-provenance/src/identity.rs]
//! Fixed system identity, assembled once per process — never per-record.

use serde::{Deserialize, Serialize};

pub const PROVENANCE_VERSION: &str = "1.0.0";
pub const PROTOCOL: &str = "WINDI-SOF-v1";

/// Installations this process will vouch for as genuine WINDI deployments.
/// Checked during `verify`'s `system_identity` check — a record claiming a
/// system name outside this allowlist cannot be VALID no matter how clean
/// its hash chain is.
pub const KNOWN_SYSTEMS: &[&str] = &["WINDI Publishing House"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemIdentity {
    pub system: String,
    pub engine: String,
    pub division: String,
    pub version: String,
    pub jurisdiction: String,
    pub infrastructure: String,
    pub server_id: String,
    pub protocol: String,
}

impl SystemIdentity {
    /// Assembles identity from the environment, falling back to the
    /// installation defaults when unset.
    pub fn from_env() -> Self {
        SystemIdentity {
            system: "WINDI Publishing House".to_string(),
            engine: "WINDI Governance Engine".to_string(),
            division: "Document Security Division".to_string(),
            version: PROVENANCE_VERSION.to_string(),
            jurisdiction: "DE — Federal Republic of Germany".to_string(),
            infrastructure: "Strato DE (German jurisdiction)".to_string(),
            server_id: std::env::var("WINDI_SERVER_ID")
                .unwrap_or_else(|_| "strato-kempten-01".to_string()),
            protocol: PROTOCOL.to_string(),
        }
    }
}
