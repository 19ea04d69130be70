// [crates/windi-guard/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("ERROR:DB_CONNECTION -> {0}")]
    Connection(String),

    #[error("ERROR:DB_QUERY -> {0}")]
    Query(#[from] libsql::Error),

    #[error("INTEGRITY:CHAIN_BREAK row_id={0}")]
    ChainBreak(i64),
}

pub type Result<T> = std::result::Result<T, GuardError>;
