// [crates/windi-provenance/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI PROVENANCE & VERIFICATION (COMPONENT E)
 * CLASIFICACIÓN: FORENSIC ATTESTATION LAYER
 * RESPONSABILIDAD: STRUCTURAL HASHING, PROVENANCE RECORDS, VERIFICATION
 *
 * Issues a digital birth certificate for every governed document: who
 * produced it, under what policy, with what cryptographic binding — and
 * answers later whether that certificate still matches the document it
 * was issued for.
 * =================================================================
 */

pub mod error;
pub mod hash;
pub mod identity;
pub mod record;
pub mod resilience;
pub mod store;
pub mod verify;

pub use error::{ProvenanceError, Result};
pub use hash::{compute_content_structural_hash, compute_structural_hash};
pub use identity::{SystemIdentity, KNOWN_SYSTEMS, PROTOCOL, PROVENANCE_VERSION};
pub use record::{build_provenance_record, BuildRecordInput, GovernanceLevel, ProvenanceRecord};
pub use resilience::{compute_resilience_score, resilience_rating, ResilienceFeatures};
pub use store::{IndexEntry, ProvenanceStore};
pub use verify::{verify_by_hash, verify_by_submission_id, VerificationResult, VerificationStatus};
