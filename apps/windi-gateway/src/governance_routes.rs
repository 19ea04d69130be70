// [apps/windi-gateway/src/governance_routes.rs]
//! The Governance HTTP surface (§6, separate port from the Bridge):
//! issues governance decisions as provenance records, answers
//! verification and compliance queries, and gates the Governance Hold
//! Protocol behind Sovereignty Level.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use windi_common::{now_epoch_ms, sha256_hex, to_canonical_json};
use windi_provenance::{build_provenance_record, verify_by_submission_id, BuildRecordInput, GovernanceLevel};
use windi_virtue_token::SLevel;

use crate::auth::RequiredVirtueToken;
use crate::error::GatewayError;
use crate::state::GatewayState;
use crate::submissions::{SubmissionQuery, SubmissionRecord};

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/submissions", get(list_submissions))
        .route("/api/submissions/:id", get(get_submission))
        .route("/api/dashboard", get(dashboard))
        .route("/api/integrity", get(integrity))
        .route("/api/status", get(status))
        .route("/api/compliance", get(compliance))
        .route("/api/health", get(health))
        .route("/api/holds", get(list_holds))
        .route("/api/holds/activate", post(activate_hold))
        .route("/api/holds/release", post(release_hold))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    protocol: &'static str,
    ts: i64,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        protocol: "WINDI-GOVERNANCE-v1",
        ts: now_epoch_ms(),
    })
}

#[derive(Deserialize)]
struct GenerateRequest {
    governance_level: GovernanceLevel,
    #[serde(default)]
    document_type: String,
    organization: String,
    isp_profile: String,
    #[serde(default)]
    metadata: serde_json::Value,
    #[serde(default)]
    identity_governance: Option<serde_json::Value>,
    #[serde(default)]
    submission_id: Option<String>,
}

async fn generate(
    State(state): State<GatewayState>,
    Json(request): Json<GenerateRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    if request.organization.trim().is_empty() {
        return Err(GatewayError::Schema("SCHEMA:MISSING_ORGANIZATION".to_string()));
    }
    if request.isp_profile.trim().is_empty() {
        return Err(GatewayError::Schema("SCHEMA:MISSING_ISP_PROFILE".to_string()));
    }

    let config_hash = sha256_hex(to_canonical_json(&json!({
        "policy_ref": state.policy_ref.as_str(),
        "isp_profile": request.isp_profile,
    })));

    let record = build_provenance_record(BuildRecordInput {
        submission_id: request.submission_id,
        governance_level: request.governance_level,
        policy_version: state.policy_ref.as_str().to_string(),
        config_hash,
        isp_profile: request.isp_profile.clone(),
        organization: request.organization.clone(),
        metadata: request.metadata,
        identity_governance: request.identity_governance,
        content: None,
        content_hash: None,
    });

    let persisted = match state.provenance_store.persist(&record) {
        Ok(path) => path,
        Err(err) if matches!(record.governance_context.level.as_str(), "HIGH") => {
            return Err(GatewayError::Provenance(err));
        }
        Err(err) => {
            tracing::warn!(error = %err, submission_id = %record.submission_id, "provenance persistence failed for a non-HIGH record, returning record anyway");
            None
        }
    };

    let ts = now_epoch_ms();

    state.submissions.record(SubmissionRecord {
        submission_id: record.submission_id.clone(),
        governance_level: record.governance_context.level.clone(),
        organization: record.governance_context.organization.clone(),
        isp_profile: record.governance_context.isp_profile.clone(),
        policy_version: record.governance_context.policy_version.clone(),
        blocked: false,
        created_at_ms: ts,
    });

    if let Err(err) = state
        .guard_repository
        .append_chained_entry(&record.document_id, "DOC_CREATED", &request.document_type, ts, "governance")
        .await
    {
        tracing::warn!(error = %err, "failed to append forensic ledger entry for generated document");
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ISSUED",
            "persisted": persisted.is_some(),
            "record": record,
        })),
    ))
}

#[derive(Deserialize)]
struct SubmissionsQueryParams {
    level: Option<String>,
    entity: Option<String>,
    after: Option<i64>,
    before: Option<i64>,
    limit: Option<usize>,
}

async fn list_submissions(
    State(state): State<GatewayState>,
    Query(params): Query<SubmissionsQueryParams>,
) -> Json<serde_json::Value> {
    let query = SubmissionQuery {
        level: params.level,
        entity: params.entity,
        after_ms: params.after,
        before_ms: params.before,
        limit: params.limit.unwrap_or(100),
    };
    Json(json!({ "submissions": state.submissions.query(&query) }))
}

async fn get_submission(State(state): State<GatewayState>, Path(id): Path<String>) -> Result<impl IntoResponse, GatewayError> {
    let Some(summary) = state.submissions.lookup(&id) else {
        return Err(GatewayError::NotFound(format!("ERROR:SUBMISSION_NOT_FOUND {id}")));
    };
    let verification = verify_by_submission_id(&state.provenance_store, &id, None);
    Ok(Json(json!({
        "submission": summary,
        "record": state.provenance_store.load_raw(&id),
        "verification": verification,
    })))
}

async fn dashboard(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    let stats = state.submissions.stats();
    let index = state.provenance_store.load_index();
    let active_holds = state.hold_manager.active_holds();
    Json(json!({
        "submission_stats": stats,
        "provenance_records_indexed": index.len(),
        "active_holds": active_holds.len(),
        "snapshot_ts": now_epoch_ms(),
    }))
}

async fn integrity(State(state): State<GatewayState>) -> Result<Json<serde_json::Value>, GatewayError> {
    let rows = state
        .guard_repository
        .ledger_rows()
        .await
        .map_err(|e| GatewayError::NotFound(format!("ERROR:LEDGER_UNAVAILABLE {e}")))?;
    let watcher = windi_guard::ChainWatcher::new();
    let (record, alert) = watcher.run_once(&rows);
    Ok(Json(json!({ "chain_check": record, "alert": alert })))
}

async fn status(State(state): State<GatewayState>) -> Result<Json<serde_json::Value>, GatewayError> {
    let day_ago = now_epoch_ms() - 24 * 60 * 60 * 1000;
    let uptime_pct = state
        .guard_repository
        .uptime_pct_since(day_ago)
        .await
        .map_err(|e| GatewayError::NotFound(format!("ERROR:STATUS_UNAVAILABLE {e}")))?;
    Ok(Json(json!({
        "uptime_pct_24h": uptime_pct,
        "submissions_governance_efficacy": state.submissions.current_sge(),
        "active_holds": state.hold_manager.active_holds().len(),
        "policy_ref": state.policy_ref.as_str(),
    })))
}

async fn compliance(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    let index = state.provenance_store.load_index();
    let high_count = index.values().filter(|e| e.governance_level == "HIGH").count();
    let medium_count = index.values().filter(|e| e.governance_level == "MEDIUM").count();
    Json(json!({
        "provenance_records": index.len(),
        "high_governance_records": high_count,
        "medium_governance_records": medium_count,
        "hold_history_entries": state.hold_manager.hold_history().len(),
    }))
}

#[derive(Serialize)]
struct HoldsResponse {
    active: Vec<windi_hold::GovernanceHold>,
    history: Option<Vec<windi_hold::GovernanceHold>>,
}

async fn list_holds(State(state): State<GatewayState>, token: Option<RequiredVirtueToken>) -> Json<HoldsResponse> {
    let history = token
        .filter(|t| t.0.s_level() == SLevel::Sovereign)
        .map(|_| state.hold_manager.hold_history());
    Json(HoldsResponse {
        active: state.hold_manager.active_holds(),
        history,
    })
}

#[derive(Deserialize)]
struct ActivateHoldRequest {
    scope: String,
    reason_code: String,
    #[serde(default)]
    reason_signals: Vec<String>,
    duration_hours: u32,
}

async fn activate_hold(
    State(state): State<GatewayState>,
    RequiredVirtueToken(token): RequiredVirtueToken,
    Json(request): Json<ActivateHoldRequest>,
) -> Result<Json<windi_hold::GovernanceHold>, GatewayError> {
    let hold = state
        .hold_manager
        .activate(&token, request.scope, request.reason_code, request.reason_signals, request.duration_hours)?;
    Ok(Json(hold))
}

#[derive(Deserialize)]
struct ReleaseHoldRequest {
    index: usize,
}

async fn release_hold(
    State(state): State<GatewayState>,
    RequiredVirtueToken(token): RequiredVirtueToken,
    Json(request): Json<ReleaseHoldRequest>,
) -> Result<Json<windi_hold::GovernanceHold>, GatewayError> {
    let hold = state.hold_manager.release(&token, request.index)?;
    Ok(Json(hold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use windi_guard::{GuardDb, GuardRepository};
    use windi_hold::HoldManager;
    use windi_provenance::ProvenanceStore;
    use windi_virtue_token::TokenIssuer;

    async fn test_state() -> GatewayState {
        let db = GuardDb::connect(":memory:", None).await.unwrap();
        GatewayState {
            bridge: Arc::new(windi_bridge::Bridge::new()),
            issuer: Arc::new(TokenIssuer::new(b"test-secret".to_vec())),
            hold_manager: Arc::new(HoldManager::new(b"test-secret".to_vec())),
            provenance_store: Arc::new(ProvenanceStore::new(tempfile::tempdir().unwrap().keep())),
            submissions: Arc::new(crate::submissions::SubmissionLedger::new()),
            guard_repository: Arc::new(GuardRepository::new(db)),
            policy_ref: Arc::new("2.2.0".to_string()),
        }
    }

    #[tokio::test]
    async fn generate_rejects_empty_organization() {
        let state = test_state().await;
        let request = GenerateRequest {
            governance_level: GovernanceLevel::Medium,
            document_type: "policy".to_string(),
            organization: "".to_string(),
            isp_profile: "bafin".to_string(),
            metadata: json!({}),
            identity_governance: None,
            submission_id: None,
        };
        let err = generate(State(state), Json(request)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Schema(_)));
    }

    #[tokio::test]
    async fn generate_high_issues_and_persists() {
        let state = test_state().await;
        let request = GenerateRequest {
            governance_level: GovernanceLevel::High,
            document_type: "policy".to_string(),
            organization: "Acme GmbH".to_string(),
            isp_profile: "bafin".to_string(),
            metadata: json!({}),
            identity_governance: None,
            submission_id: Some("SUB-TEST-1".to_string()),
        };
        let response = generate(State(state.clone()), Json(request)).await.unwrap();
        let _ = response;
        assert!(state.submissions.lookup("SUB-TEST-1").is_some());
        assert!(state.provenance_store.load("SUB-TEST-1").is_some());
    }
}
