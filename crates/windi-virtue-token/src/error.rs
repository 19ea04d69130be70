// [crates/windi-virtue-token/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("AUTH:SIGNATURE_INVALID")]
    SignatureInvalid,

    #[error("AUTH:TOKEN_EXPIRED")]
    TokenExpired,

    #[error("AUTH:MALFORMED_TOKEN {0}")]
    Malformed(String),
}

impl TokenError {
    pub fn code(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, TokenError>;
