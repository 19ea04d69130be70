// [apps/windi-gateway/src/submissions.rs]
//! In-process index over every submission this process has decided on —
//! backs `GET /api/submissions` and supplies the Guard's `FlowMonitor` with
//! a pending queue and a governance efficacy score, matching the original
//! `SubmissionRegistry`'s `query`/`get_stats` surface.

use std::sync::Mutex;

use serde::Serialize;

use windi_guard::models::PendingSubmission;

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    pub submission_id: String,
    pub governance_level: String,
    pub organization: String,
    pub isp_profile: String,
    pub policy_version: String,
    pub blocked: bool,
    pub created_at_ms: i64,
}

#[derive(Debug, Default, Serialize)]
pub struct SubmissionStats {
    pub total: usize,
    pub by_level: std::collections::HashMap<String, usize>,
    pub blocked: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct SubmissionQuery {
    pub level: Option<String>,
    pub entity: Option<String>,
    pub after_ms: Option<i64>,
    pub before_ms: Option<i64>,
    pub limit: usize,
}

impl Default for SubmissionLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// This reimplementation decides every submission synchronously inside the
/// `/api/generate` handler — there is no asynchronous human-review queue
/// to hold a submission "pending" in. `pending_submissions()` therefore
/// always returns empty; the type still exists (and is still exercised by
/// the Guard's `FlowMonitor`) so a future asynchronous review workflow has
/// somewhere to register one.
pub struct SubmissionLedger {
    records: Mutex<Vec<SubmissionRecord>>,
}

impl SubmissionLedger {
    pub fn new() -> Self {
        SubmissionLedger {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn record(&self, record: SubmissionRecord) {
        self.records.lock().expect("submission ledger lock poisoned").push(record);
    }

    pub fn lookup(&self, submission_id: &str) -> Option<SubmissionRecord> {
        self.records
            .lock()
            .expect("submission ledger lock poisoned")
            .iter()
            .find(|r| r.submission_id == submission_id)
            .cloned()
    }

    pub fn query(&self, q: &SubmissionQuery) -> Vec<SubmissionRecord> {
        let records = self.records.lock().expect("submission ledger lock poisoned");
        records
            .iter()
            .rev()
            .filter(|r| q.level.as_deref().map_or(true, |l| r.governance_level.eq_ignore_ascii_case(l)))
            .filter(|r| q.entity.as_deref().map_or(true, |e| r.organization.to_lowercase().contains(&e.to_lowercase())))
            .filter(|r| q.after_ms.map_or(true, |a| r.created_at_ms >= a))
            .filter(|r| q.before_ms.map_or(true, |b| r.created_at_ms <= b))
            .take(q.limit.max(1))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> SubmissionStats {
        let records = self.records.lock().expect("submission ledger lock poisoned");
        let mut stats = SubmissionStats {
            total: records.len(),
            ..Default::default()
        };
        for record in records.iter() {
            *stats.by_level.entry(record.governance_level.clone()).or_insert(0) += 1;
            if record.blocked {
                stats.blocked += 1;
            }
        }
        stats
    }

    /// Submissions Governance Efficacy: the fraction (as a 0-100 score) of
    /// recorded submissions that were *not* BLOCKED. `100.0` with none
    /// recorded yet — a freshly started gateway has nothing to penalize.
    pub fn current_sge(&self) -> f64 {
        let records = self.records.lock().expect("submission ledger lock poisoned");
        if records.is_empty() {
            return 100.0;
        }
        let clean = records.iter().filter(|r| !r.blocked).count();
        clean as f64 / records.len() as f64 * 100.0
    }
}

impl windi_guard::FlowSource for SubmissionLedger {
    fn pending_submissions(&self) -> Vec<PendingSubmission> {
        Vec::new()
    }

    fn current_sge(&self) -> f64 {
        SubmissionLedger::current_sge(self)
    }
}
