// [crates/windi-provenance/src/verify.rs]
//! Three-state provenance verification: VALID, UNKNOWN, TAMPERED.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hash::compute_structural_hash;
use crate::identity::{KNOWN_SYSTEMS, PROTOCOL};
use crate::record::DecisionPayload;
use crate::store::ProvenanceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Valid,
    Unknown,
    Tampered,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    pub submission_id: String,
    pub verified_at: String,
    pub protocol: String,
    pub checks: BTreeMap<String, bool>,
    pub status: VerificationStatus,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance_context: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepfake_resilience: Option<Value>,
}

fn unknown(submission_id: &str, reason: &str, checks: BTreeMap<String, bool>) -> VerificationResult {
    VerificationResult {
        submission_id: submission_id.to_string(),
        verified_at: Utc::now().to_rfc3339(),
        protocol: PROTOCOL.to_string(),
        checks,
        status: VerificationStatus::Unknown,
        reason: reason.to_string(),
        expected_hash: None,
        computed_hash: None,
        governance_context: None,
        deepfake_resilience: None,
    }
}

/// Verifies a document's provenance by submission ID. When
/// `decision_payload` is supplied, recomputes the structural hash and
/// compares it to the stored one (full verification); otherwise checks
/// only registry presence and record integrity (partial verification).
pub fn verify_by_submission_id(
    store: &ProvenanceStore,
    submission_id: &str,
    decision_payload: Option<&DecisionPayload>,
) -> VerificationResult {
    let mut checks = BTreeMap::new();

    let idx = store.load_index();
    let Some(entry) = idx.get(submission_id) else {
        checks.insert("registry_match".to_string(), false);
        return unknown(submission_id, "submission_id_not_found_in_index", checks);
    };
    checks.insert("registry_match".to_string(), true);

    let Some(record) = store.load_raw(submission_id) else {
        checks.insert("record_exists".to_string(), false);
        return unknown(submission_id, "record_file_missing", checks);
    };
    checks.insert("record_exists".to_string(), true);

    let system = record
        .get("system_identity")
        .and_then(|s| s.get("system"))
        .and_then(Value::as_str)
        .unwrap_or("");
    checks.insert(
        "system_identity".to_string(),
        KNOWN_SYSTEMS.contains(&system),
    );

    let governance_context = record.get("governance_context").cloned().unwrap_or(Value::Null);
    let level = governance_context.get("level").and_then(Value::as_str).unwrap_or("");
    checks.insert(
        "governance_level_valid".to_string(),
        matches!(level, "HIGH" | "MEDIUM" | "LOW"),
    );
    checks.insert(
        "policy_version_present".to_string(),
        governance_context
            .get("policy_version")
            .and_then(Value::as_str)
            .is_some_and(|v| !v.is_empty()),
    );

    let crypto = record.get("cryptographic_proof").cloned().unwrap_or(Value::Null);
    let stored_structural = crypto
        .get("structural_hash")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let stored_provenance = crypto
        .get("provenance_hash")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let expected_chain = format!(
        "{}→{}",
        &stored_structural[..stored_structural.len().min(16)],
        &stored_provenance[..stored_provenance.len().min(16)]
    );
    checks.insert(
        "hash_present".to_string(),
        !stored_structural.is_empty() && !stored_provenance.is_empty(),
    );
    checks.insert(
        "hash_chain_valid".to_string(),
        crypto.get("hash_chain").and_then(Value::as_str) == Some(expected_chain.as_str()),
    );

    if let Some(payload) = decision_payload {
        let recomputed = compute_structural_hash(payload);
        let matches = recomputed == stored_structural;
        checks.insert("structural_hash_match".to_string(), matches);

        if !matches {
            return VerificationResult {
                submission_id: submission_id.to_string(),
                verified_at: Utc::now().to_rfc3339(),
                protocol: PROTOCOL.to_string(),
                checks,
                status: VerificationStatus::Tampered,
                reason: "structural_hash_mismatch".to_string(),
                expected_hash: Some(stored_structural),
                computed_hash: Some(recomputed),
                governance_context: Some(governance_context),
                deepfake_resilience: None,
            };
        }
    }

    checks.insert(
        "protocol_valid".to_string(),
        record.get("_protocol").and_then(Value::as_str) == Some(PROTOCOL),
    );

    let all_critical = checks.values().all(|v| *v);
    let (status, reason) = if all_critical {
        (VerificationStatus::Valid, "all_checks_passed".to_string())
    } else {
        let failed: Vec<&str> = checks
            .iter()
            .filter(|(_, v)| !**v)
            .map(|(k, _)| k.as_str())
            .collect();
        (
            VerificationStatus::Tampered,
            format!("checks_failed: {}", failed.join(", ")),
        )
    };

    VerificationResult {
        submission_id: submission_id.to_string(),
        verified_at: Utc::now().to_rfc3339(),
        protocol: PROTOCOL.to_string(),
        checks,
        status,
        reason,
        expected_hash: None,
        computed_hash: None,
        governance_context: Some(governance_context),
        deepfake_resilience: record.get("deepfake_resilience").cloned(),
    }
}

/// Verifies by a provenance-hash prefix (useful when only a hash embedded
/// in document metadata is available). Scans the index linearly — this
/// store is not expected to hold more than the low thousands of records.
pub fn verify_by_hash(store: &ProvenanceStore, provenance_hash_prefix: &str) -> VerificationResult {
    let idx = store.load_index();
    for (submission_id, entry) in idx.iter() {
        if entry.structural_hash.starts_with(provenance_hash_prefix) {
            return verify_by_submission_id(store, submission_id, None);
        }
    }

    VerificationResult {
        submission_id: String::new(),
        verified_at: Utc::now().to_rfc3339(),
        protocol: PROTOCOL.to_string(),
        checks: BTreeMap::new(),
        status: VerificationStatus::Unknown,
        reason: format!(
            "no_record_matching_hash_prefix: {}",
            &provenance_hash_prefix[..provenance_hash_prefix.len().min(16)]
        ),
        expected_hash: None,
        computed_hash: None,
        governance_context: None,
        deepfake_resilience: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{build_provenance_record, BuildRecordInput, GovernanceLevel};
    use serde_json::json;
    use tempfile::tempdir;

    fn build(submission_id: &str, organization: &str) -> (DecisionPayload, crate::record::ProvenanceRecord) {
        let record = build_provenance_record(BuildRecordInput {
            submission_id: Some(submission_id.to_string()),
            governance_level: GovernanceLevel::High,
            policy_version: "2.2.0".to_string(),
            config_hash: "cfg".to_string(),
            isp_profile: "bafin".to_string(),
            organization: organization.to_string(),
            metadata: json!({}),
            identity_governance: None,
            content: None,
            content_hash: None,
        });
        (record.decision_payload.clone(), record)
    }

    #[test]
    fn valid_when_payload_matches_stored_record() {
        let dir = tempdir().unwrap();
        let store = ProvenanceStore::new(dir.path());
        let (payload, record) = build("TEST-HIGH-001", "Acme GmbH");
        store.persist(&record).unwrap();

        let result = verify_by_submission_id(&store, "TEST-HIGH-001", Some(&payload));
        assert_eq!(result.status, VerificationStatus::Valid);
    }

    #[test]
    fn tampered_when_payload_organization_changed() {
        let dir = tempdir().unwrap();
        let store = ProvenanceStore::new(dir.path());
        let (mut payload, record) = build("TEST-HIGH-002", "Acme GmbH");
        store.persist(&record).unwrap();

        payload.organization = "Different Org".to_string();
        let result = verify_by_submission_id(&store, "TEST-HIGH-002", Some(&payload));
        assert_eq!(result.status, VerificationStatus::Tampered);
        assert_eq!(result.reason, "structural_hash_mismatch");
    }

    #[test]
    fn unknown_when_submission_id_absent() {
        let dir = tempdir().unwrap();
        let store = ProvenanceStore::new(dir.path());
        let result = verify_by_submission_id(&store, "NOPE-999", None);
        assert_eq!(result.status, VerificationStatus::Unknown);
    }
}
