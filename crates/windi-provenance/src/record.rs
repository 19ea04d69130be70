// [crates/windi-provenance/src/record.rs]
//! Provenance record assembly — the digital birth certificate issued for
//! every governed document.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use windi_common::hashing::sha256_hex;
use windi_common::to_canonical_json;

use crate::hash::{compute_content_structural_hash, compute_structural_hash};
use crate::identity::{SystemIdentity, PROTOCOL, PROVENANCE_VERSION};
use crate::resilience::{compute_resilience_score, resilience_rating, ResilienceFeatures};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GovernanceLevel {
    High,
    Medium,
    Low,
}

impl GovernanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GovernanceLevel::High => "HIGH",
            GovernanceLevel::Medium => "MEDIUM",
            GovernanceLevel::Low => "LOW",
        }
    }
}

/// Everything that went into a governance decision — the payload that gets
/// structurally hashed and, later, recomputed for tamper verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPayload {
    pub submission_id: String,
    pub governance_level: String,
    pub policy_version: String,
    pub config_hash: String,
    pub isp_profile: String,
    pub organization: String,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub identity_governance: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceContext {
    pub level: String,
    pub isp_profile: String,
    pub policy_version: String,
    pub config_hash: String,
    pub organization: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptographicProof {
    pub structural_hash: String,
    pub provenance_hash: String,
    pub content_structural_hash: Option<String>,
    pub content_hash: Option<String>,
    pub algorithm: String,
    pub hash_chain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepfakeResilience {
    pub score: u8,
    pub rating: String,
    pub max_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationEndpoint {
    pub verify_url: String,
    pub verify_hash: String,
    pub protocol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    #[serde(rename = "_provenance_version")]
    pub provenance_version: String,
    #[serde(rename = "_protocol")]
    pub protocol: String,
    pub provenance_id: String,
    pub created_at: String,
    pub submission_id: String,
    pub document_id: String,
    pub governance_context: GovernanceContext,
    pub identity_governance: Value,
    pub system_identity: SystemIdentity,
    pub cryptographic_proof: CryptographicProof,
    pub deepfake_resilience: DeepfakeResilience,
    pub verification: VerificationEndpoint,
    pub decision_payload: DecisionPayload,
}

/// Inputs to [`build_provenance_record`]. `submission_id` is required for
/// HIGH; auto-generated (`AUTO-{provenance_id}`) otherwise.
pub struct BuildRecordInput {
    pub submission_id: Option<String>,
    pub governance_level: GovernanceLevel,
    pub policy_version: String,
    pub config_hash: String,
    pub isp_profile: String,
    pub organization: String,
    pub metadata: Value,
    pub identity_governance: Option<Value>,
    pub content: Option<String>,
    pub content_hash: Option<String>,
}

pub fn build_provenance_record(input: BuildRecordInput) -> ProvenanceRecord {
    let provenance_id = format!(
        "WINDI-PROV-{}",
        Uuid::new_v4().simple().to_string()[..12].to_uppercase()
    );

    let submission_id = input
        .submission_id
        .unwrap_or_else(|| format!("AUTO-{provenance_id}"));

    let identity_governance = input.identity_governance.unwrap_or_else(|| json!({}));

    let decision_payload = DecisionPayload {
        submission_id: submission_id.clone(),
        governance_level: input.governance_level.as_str().to_string(),
        policy_version: input.policy_version.clone(),
        config_hash: input.config_hash.clone(),
        isp_profile: input.isp_profile.clone(),
        organization: input.organization.clone(),
        metadata: input.metadata.clone(),
        identity_governance: identity_governance.clone(),
    };

    let structural_hash = compute_structural_hash(&decision_payload);

    let content_structural_hash = input
        .content
        .as_deref()
        .map(|content| compute_content_structural_hash(content, &input.metadata));

    let system_identity = SystemIdentity::from_env();

    let provenance_hash_payload = json!({
        "provenance_id": provenance_id,
        "structural_hash": structural_hash,
        "content_structural_hash": content_structural_hash,
        "system": system_identity.system,
        "jurisdiction": system_identity.jurisdiction,
    });
    let provenance_hash = sha256_hex(to_canonical_json(&provenance_hash_payload));

    let features = ResilienceFeatures {
        provenance_record: matches!(input.governance_level, GovernanceLevel::High),
        registry: matches!(
            input.governance_level,
            GovernanceLevel::High | GovernanceLevel::Medium
        ),
        structural_hash: true,
        embed_pdf_metadata: matches!(
            input.governance_level,
            GovernanceLevel::High | GovernanceLevel::Medium
        ),
        tamper_evidence: matches!(input.governance_level, GovernanceLevel::High),
        identity_governance: identity_governance.as_object().is_some_and(|m| !m.is_empty()),
        forensic_ledger: matches!(input.governance_level, GovernanceLevel::High),
        four_eyes: matches!(input.governance_level, GovernanceLevel::High),
        jurisdiction_bound: true,
    };
    let score = compute_resilience_score(input.governance_level, features);
    let verify_hash = provenance_hash[..32].to_string();

    ProvenanceRecord {
        provenance_version: PROVENANCE_VERSION.to_string(),
        protocol: PROTOCOL.to_string(),
        provenance_id: provenance_id.clone(),
        created_at: Utc::now().to_rfc3339(),
        submission_id: submission_id.clone(),
        document_id: submission_id.clone(),
        governance_context: GovernanceContext {
            level: input.governance_level.as_str().to_string(),
            isp_profile: input.isp_profile,
            policy_version: input.policy_version,
            config_hash: input.config_hash,
            organization: input.organization,
        },
        identity_governance,
        system_identity,
        cryptographic_proof: CryptographicProof {
            hash_chain: format!("{}→{}", &structural_hash[..16], &provenance_hash[..16]),
            structural_hash,
            provenance_hash,
            content_structural_hash,
            content_hash: input.content_hash,
            algorithm: "SHA-256".to_string(),
        },
        deepfake_resilience: DeepfakeResilience {
            score,
            rating: resilience_rating(score).to_string(),
            max_score: 100,
        },
        verification: VerificationEndpoint {
            verify_url: format!("/api/verify/{submission_id}"),
            verify_hash,
            protocol: PROTOCOL.to_string(),
        },
        decision_payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input(level: GovernanceLevel, submission_id: Option<&str>) -> BuildRecordInput {
        BuildRecordInput {
            submission_id: submission_id.map(str::to_string),
            governance_level: level,
            policy_version: "2.2.0".to_string(),
            config_hash: "cfg-abc".to_string(),
            isp_profile: "bafin".to_string(),
            organization: "Acme GmbH".to_string(),
            metadata: json!({"doc_type": "policy"}),
            identity_governance: None,
            content: None,
            content_hash: None,
        }
    }

    #[test]
    fn provenance_id_matches_expected_format() {
        let record = build_provenance_record(sample_input(GovernanceLevel::High, None));
        assert!(record.provenance_id.starts_with("WINDI-PROV-"));
        assert_eq!(record.provenance_id.len(), "WINDI-PROV-".len() + 12);
        let suffix = &record.provenance_id["WINDI-PROV-".len()..];
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_lowercase()));
    }

    #[test]
    fn auto_submission_id_derives_from_provenance_id() {
        let record = build_provenance_record(sample_input(GovernanceLevel::Low, None));
        assert_eq!(record.submission_id, format!("AUTO-{}", record.provenance_id));
    }

    #[test]
    fn hash_chain_uses_first_16_chars_of_each_hash() {
        let record = build_provenance_record(sample_input(GovernanceLevel::Medium, Some("SUB-1")));
        let proof = &record.cryptographic_proof;
        let expected = format!(
            "{}→{}",
            &proof.structural_hash[..16],
            &proof.provenance_hash[..16]
        );
        assert_eq!(proof.hash_chain, expected);
    }
}
