// [crates/windi-guard/src/models.rs]
//! Record shapes the Guard's sub-modules produce and persist. These are
//! the Rust mirror of the `health_checks` / `alerts` / `isp_scans` /
//! `chain_checks` / `guard_reports` / `sge_snapshots` / `hash_baselines`
//! tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Ok,
    Degraded,
    Down,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Ok => "OK",
            ServiceStatus::Degraded => "DEGRADED",
            ServiceStatus::Down => "DOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
    Emergency,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "INFO",
            AlertSeverity::Warning => "WARNING",
            AlertSeverity::Critical => "CRITICAL",
            AlertSeverity::Emergency => "EMERGENCY",
        }
    }
}

/// A service the `HealthProbe` polls. `critical` gates the EMERGENCY
/// escalation rule.
#[derive(Debug, Clone)]
pub struct ServiceTarget {
    pub name: String,
    pub base_url: String,
    pub path: String,
    pub critical: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckRecord {
    pub service: String,
    pub status: String,
    pub latency_ms: i64,
    pub consecutive_failures: u32,
    pub checked_at_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub module: String,
    pub title: String,
    pub severity: String,
    pub detail: String,
    pub fired_at_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IspScanRecord {
    pub profile: String,
    pub valid: bool,
    pub tampered: bool,
    pub missing_fields: Vec<String>,
    pub scanned_at_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainCheckRecord {
    pub rows_checked: u64,
    pub breaks: u64,
    pub checked_at_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuardReport {
    pub week_start_ms: i64,
    pub week_end_ms: i64,
    pub uptime_pct: f64,
    pub chain_breaks: u64,
    pub isp_all_valid: bool,
    pub verified: bool,
    pub generated_at_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SgeSnapshot {
    pub sge: f64,
    pub recorded_at_ms: i64,
}

/// A row from the forensic ledger, in insertion (`id`) order.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerRow {
    pub id: i64,
    pub document_id: String,
    pub action: String,
    pub actor: String,
    pub timestamp_ms: i64,
    pub domain_tag: String,
    pub current_hash: String,
}

/// A submission the Governance API has not yet resolved, as surfaced by
/// whatever in-process store the binary wires in via [`crate::FlowSource`].
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub submission_id: String,
    pub created_at_ms: i64,
}
