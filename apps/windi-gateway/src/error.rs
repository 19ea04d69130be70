// [apps/windi-gateway/src/error.rs]
//! The HTTP boundary's error type. Every other crate in the workspace
//! returns a typed `Result`; this is the one place that converts a
//! rejection into a status code and a JSON body, per spec.md §9's
//! "exceptions for control flow" design note.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Schema(String),

    #[error(transparent)]
    Token(#[from] windi_virtue_token::TokenError),

    #[error(transparent)]
    Hold(#[from] windi_hold::HoldError),

    #[error(transparent)]
    Provenance(#[from] windi_provenance::ProvenanceError),

    #[error("AUTH:MISSING_BEARER_TOKEN")]
    MissingToken,

    #[error("AUTH:MALFORMED_BEARER_TOKEN {0}")]
    MalformedToken(String),

    #[error("{0}")]
    NotFound(String),
}

impl GatewayError {
    fn status(&self) -> StatusCode {
        match self {
            GatewayError::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Token(_) | GatewayError::MissingToken | GatewayError::MalformedToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            GatewayError::Hold(_) => StatusCode::FORBIDDEN,
            GatewayError::Provenance(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "status": "BLOCKED",
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
