// [crates/windi-provenance/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvenanceError {
    #[error("[PROV_IO_FAULT] failed to persist provenance record: {0}")]
    Io(#[from] std::io::Error),

    #[error("[PROV_SERIALIZE_FAULT] failed to (de)serialize provenance record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("[PROV_NOT_PERSISTED] governance level {0} does not persist without a FORCE- prefix")]
    NotPersisted(String),
}

pub type Result<T> = std::result::Result<T, ProvenanceError>;
