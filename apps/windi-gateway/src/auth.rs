// [apps/windi-gateway/src/auth.rs]
//! Bearer credential handling for the Bridge and Governance HTTP surfaces.
//!
//! A Virtue Token travels as `Authorization: Bearer <base64(json(SignedToken))>`.
//! Every read path that touches the aggregator runs the extracted token
//! through `windi_virtue_token::filter_*` before a byte reaches the caller
//! — no visibility decision is ever made by the handler itself.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use base64::{engine::general_purpose::STANDARD, Engine};
use windi_virtue_token::{SignedToken, TokenIssuer, VirtueToken};

use crate::error::GatewayError;

fn extract_bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn decode_and_validate(raw: &str, issuer: &TokenIssuer) -> Result<VirtueToken, GatewayError> {
    let bytes = STANDARD
        .decode(raw)
        .map_err(|_| GatewayError::MalformedToken("not valid base64".to_string()))?;
    let signed: SignedToken = serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::MalformedToken(e.to_string()))?;
    issuer
        .validate(&signed, windi_common::now_epoch_ms())
        .map_err(GatewayError::from)
}

/// Present iff the caller supplied a well-formed, validated token. Absence
/// is not an error — callers that accept this extractor serve an
/// unfiltered view when no token is presented.
pub struct OptionalVirtueToken(pub Option<VirtueToken>);

impl<S> FromRequestParts<S> for OptionalVirtueToken
where
    std::sync::Arc<TokenIssuer>: FromRef<S>,
    S: Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let issuer = std::sync::Arc::<TokenIssuer>::from_ref(state);
        match extract_bearer(parts) {
            None => Ok(OptionalVirtueToken(None)),
            Some(raw) => decode_and_validate(raw, &issuer).map(|t| OptionalVirtueToken(Some(t))),
        }
    }
}

/// Required on endpoints gated by Sovereignty Level (Hold activate/release,
/// administrative registry reads) — missing or invalid credentials reject
/// the request before the handler body runs.
pub struct RequiredVirtueToken(pub VirtueToken);

impl<S> FromRequestParts<S> for RequiredVirtueToken
where
    std::sync::Arc<TokenIssuer>: FromRef<S>,
    S: Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let issuer = std::sync::Arc::<TokenIssuer>::from_ref(state);
        let raw = extract_bearer(parts).ok_or(GatewayError::MissingToken)?;
        decode_and_validate(raw, &issuer).map(RequiredVirtueToken)
    }
}
