// [crates/windi-guard/src/chain_watcher.rs]
//! `ChainWatcher`: every 300s, walks the forensic ledger and verifies the
//! audit chain's hash links, excluding `domain_tag = "legacy"` rows.

use windi_common::now_epoch_ms;

use crate::hash_chain::verify_chain;
use crate::models::{Alert, AlertSeverity, ChainCheckRecord, LedgerRow};

pub struct ChainWatcher;

impl ChainWatcher {
    pub fn new() -> Self {
        ChainWatcher
    }

    /// `rows` must already exclude `domain_tag = "legacy"` entries and be
    /// ordered by `id` ascending.
    pub fn run_once(&self, rows: &[LedgerRow]) -> (ChainCheckRecord, Option<Alert>) {
        let (breaks, broken_ids) = verify_chain(rows);

        let record = ChainCheckRecord {
            rows_checked: rows.len() as u64,
            breaks,
            checked_at_ms: now_epoch_ms(),
        };

        let alert = if breaks > 0 {
            Some(Alert {
                module: "chain_watcher".to_string(),
                title: "forensic ledger hash break".to_string(),
                severity: AlertSeverity::Critical.as_str().to_string(),
                detail: format!("{breaks} break(s) at row id(s) {broken_ids:?}"),
                fired_at_ms: now_epoch_ms(),
            })
        } else {
            None
        };

        (record, alert)
    }
}

impl Default for ChainWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_chain::{compute_chain_hash, GENESIS};

    fn row(id: i64, hash: &str) -> LedgerRow {
        LedgerRow {
            id,
            document_id: "DOC-1".to_string(),
            action: "CREATE".to_string(),
            actor: "alice".to_string(),
            timestamp_ms: 1_000,
            domain_tag: "standard".to_string(),
            current_hash: hash.to_string(),
        }
    }

    #[test]
    fn an_intact_chain_produces_no_alert() {
        let h1 = compute_chain_hash("DOC-1", "CREATE", "alice", 1_000, GENESIS);
        let rows = vec![row(1, &h1)];
        let (record, alert) = ChainWatcher::new().run_once(&rows);
        assert_eq!(record.breaks, 0);
        assert!(alert.is_none());
    }

    #[test]
    fn a_broken_chain_fires_a_critical_alert() {
        let rows = vec![row(1, "not-the-right-hash")];
        let (record, alert) = ChainWatcher::new().run_once(&rows);
        assert_eq!(record.breaks, 1);
        assert!(alert.is_some());
    }
}
