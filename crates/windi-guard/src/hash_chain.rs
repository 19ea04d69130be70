// [crates/windi-guard/src/hash_chain.rs]
//! The forensic ledger's audit-chain hash: `h_i = SHA256(d_i ⊕ a_i ⊕
//! actor_i ⊕ ts_i ⊕ h_{i-1})[:16]`, `h_0 = "GENESIS"`. Grounded on the
//! teacher's `AuditRepository::seal_mission_audit_trail` hash-linking.

use sha2::{Digest, Sha256};

use crate::models::LedgerRow;

pub const GENESIS: &str = "GENESIS";

pub fn compute_chain_hash(document_id: &str, action: &str, actor: &str, timestamp_ms: i64, previous_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_id.as_bytes());
    hasher.update(action.as_bytes());
    hasher.update(actor.as_bytes());
    hasher.update(timestamp_ms.to_string().as_bytes());
    hasher.update(previous_hash.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

/// Walks `rows` in `id` order and counts breaks — either a row whose
/// `current_hash` does not match the recomputed chain hash given the
/// previous row's `current_hash` (or [`GENESIS`] for the first row), or a
/// row whose `timestamp_ms` regresses before its predecessor's (§4.F:
/// the ChainWatcher verifies "temporal monotonicity and hash presence").
pub fn verify_chain(rows: &[LedgerRow]) -> (u64, Vec<i64>) {
    let mut previous_hash = GENESIS.to_string();
    let mut previous_ts = i64::MIN;
    let mut breaks = 0u64;
    let mut broken_ids = Vec::new();

    for row in rows {
        let expected = compute_chain_hash(&row.document_id, &row.action, &row.actor, row.timestamp_ms, &previous_hash);
        let hash_ok = expected == row.current_hash;
        let monotonic_ok = row.timestamp_ms >= previous_ts;

        if !hash_ok || !monotonic_ok {
            breaks += 1;
            broken_ids.push(row.id);
        }

        previous_hash = row.current_hash.clone();
        previous_ts = row.timestamp_ms;
    }

    (breaks, broken_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, doc: &str, action: &str, actor: &str, ts: i64, hash: &str) -> LedgerRow {
        LedgerRow {
            id,
            document_id: doc.to_string(),
            action: action.to_string(),
            actor: actor.to_string(),
            timestamp_ms: ts,
            domain_tag: "standard".to_string(),
            current_hash: hash.to_string(),
        }
    }

    #[test]
    fn an_intact_chain_reconstructs_with_zero_breaks() {
        let h1 = compute_chain_hash("DOC-1", "CREATE", "alice", 1_000, GENESIS);
        let h2 = compute_chain_hash("DOC-1", "APPROVE", "bob", 2_000, &h1);

        let rows = vec![
            row(1, "DOC-1", "CREATE", "alice", 1_000, &h1),
            row(2, "DOC-1", "APPROVE", "bob", 2_000, &h2),
        ];

        let (breaks, broken) = verify_chain(&rows);
        assert_eq!(breaks, 0);
        assert!(broken.is_empty());
    }

    #[test]
    fn a_tampered_row_is_detected_and_breaks_the_rest_of_the_chain() {
        let h1 = compute_chain_hash("DOC-1", "CREATE", "alice", 1_000, GENESIS);
        let h2 = compute_chain_hash("DOC-1", "APPROVE", "bob", 2_000, &h1);

        let rows = vec![
            row(1, "DOC-1", "CREATE", "alice", 1_000, &h1),
            row(2, "DOC-1", "APPROVE", "carol", 2_000, &h2), // actor tampered after hashing
        ];

        let (breaks, broken) = verify_chain(&rows);
        assert_eq!(breaks, 1);
        assert_eq!(broken, vec![2]);
    }

    #[test]
    fn a_row_timestamped_before_its_predecessor_is_a_break_even_with_a_correct_hash() {
        let h1 = compute_chain_hash("DOC-1", "CREATE", "alice", 2_000, GENESIS);
        // h2 is correctly derived from h1, but its timestamp regresses.
        let h2 = compute_chain_hash("DOC-1", "APPROVE", "bob", 1_000, &h1);

        let rows = vec![
            row(1, "DOC-1", "CREATE", "alice", 2_000, &h1),
            row(2, "DOC-1", "APPROVE", "bob", 1_000, &h2),
        ];

        let (breaks, broken) = verify_chain(&rows);
        assert_eq!(breaks, 1);
        assert_eq!(broken, vec![2]);
    }
}
