// [crates/windi-emitter/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("CONFIG: {0}")]
    Config(String),

    #[error("SIGNATURE: {0}")]
    Signature(String),
}

pub type Result<T> = std::result::Result<T, EmitterError>;
