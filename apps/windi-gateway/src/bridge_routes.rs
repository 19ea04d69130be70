// [apps/windi-gateway/src/bridge_routes.rs]
//! The Bridge HTTP surface (§6): schema/signature/replay admission,
//! shelf-indexed reads, and key registration. Every read that reaches the
//! aggregator is filtered server-side via [`OptionalVirtueToken`] before
//! a byte leaves the process.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use windi_common::wire::WirePacket;
use windi_registry::{Shelf, SIGNAL_REGISTRY};
use windi_virtue_token::{filter_dashboard, filter_signals};

use crate::auth::OptionalVirtueToken;
use crate::state::GatewayState;

const SHELF_DETAIL_LIMIT: usize = 50;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/shelf/:shelf", get(shelf_detail))
        .route("/api/v1/registry", get(registry))
        .route("/api/v1/telemetry", post(telemetry))
        .route("/api/v1/telemetry/batch", post(telemetry_batch))
        .route("/api/v1/register", post(register))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    protocol: &'static str,
    ts: i64,
    motto: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        protocol: "WINDI-BRIDGE-v1",
        ts: windi_common::now_epoch_ms(),
        motto: "signal before consequence",
    })
}

async fn dashboard(
    State(state): State<GatewayState>,
    OptionalVirtueToken(token): OptionalVirtueToken,
) -> impl IntoResponse {
    let snapshot = state.bridge.dashboard();
    match token {
        Some(token) => Json(serde_json::to_value(filter_dashboard(&snapshot, &token)).unwrap()),
        None => Json(serde_json::to_value(snapshot).unwrap()),
    }
}

async fn shelf_detail(
    State(state): State<GatewayState>,
    OptionalVirtueToken(token): OptionalVirtueToken,
    Path(shelf): Path<String>,
) -> impl IntoResponse {
    let Some(shelf) = Shelf::parse(&shelf.to_uppercase()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("SCHEMA:UNKNOWN_SHELF {shelf}")})),
        )
            .into_response();
    };

    let signals = state.bridge.shelf_detail(shelf, SHELF_DETAIL_LIMIT);
    let body = match token {
        Some(token) => serde_json::to_value(filter_signals(&signals, &token)).unwrap(),
        None => serde_json::to_value(signals).unwrap(),
    };
    Json(body).into_response()
}

async fn registry() -> Json<serde_json::Value> {
    let entries: Vec<_> = SIGNAL_REGISTRY
        .iter()
        .map(|m| {
            serde_json::json!({
                "code": m.code,
                "shelf": m.shelf.as_str(),
                "name": m.name,
                "severity": m.severity.as_str(),
            })
        })
        .collect();
    Json(serde_json::json!({ "registry": entries }))
}

async fn telemetry(State(state): State<GatewayState>, Json(packet): Json<WirePacket>) -> impl IntoResponse {
    let outcome = state.bridge.ingest(&packet);
    let status = if outcome.accepted { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    (status, Json(outcome))
}

#[derive(Deserialize)]
struct TelemetryBatchRequest {
    packets: Vec<WirePacket>,
}

async fn telemetry_batch(
    State(state): State<GatewayState>,
    Json(request): Json<TelemetryBatchRequest>,
) -> impl IntoResponse {
    Json(state.bridge.ingest_batch(&request.packets))
}

#[derive(Deserialize)]
struct RegisterRequest {
    client_id_hash: String,
    key_id: String,
    hmac_key_b64: String,
}

#[derive(Serialize)]
struct RegisterResponse {
    status: &'static str,
    key_id: String,
    client_id_hash: String,
}

async fn register(State(state): State<GatewayState>, Json(request): Json<RegisterRequest>) -> impl IntoResponse {
    let key = match STANDARD.decode(&request.hmac_key_b64) {
        Ok(key) => key,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "SCHEMA:INVALID_HMAC_KEY_ENCODING"})),
            )
                .into_response();
        }
    };

    state.bridge.register_client(request.key_id.clone(), key);

    (
        StatusCode::OK,
        Json(RegisterResponse {
            status: "REGISTERED",
            key_id: request.key_id,
            client_id_hash: request.client_id_hash,
        }),
    )
        .into_response()
}
