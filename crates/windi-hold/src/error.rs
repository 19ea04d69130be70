// [crates/windi-hold/src/error.rs]

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HoldError {
    #[error("HOLD:UNAUTHORIZED")]
    Unauthorized,

    #[error("HOLD:DURATION_EXCEEDED duration_hours={0}")]
    DurationExceeded(u32),

    #[error("HOLD:RELEASE_UNAUTHORIZED")]
    ReleaseUnauthorized,

    #[error("HOLD:NO_ACTIVE_HOLDS")]
    NoActiveHolds,

    #[error("HOLD:ALREADY_RELEASED")]
    AlreadyReleased,
}

impl HoldError {
    pub fn code(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, HoldError>;
