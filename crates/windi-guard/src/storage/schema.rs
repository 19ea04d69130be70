// [crates/windi-guard/src/storage/schema.rs]
//! Idempotent schema bootstrap for the Guard's relational tables, matching
//! the teacher's `CREATE TABLE IF NOT EXISTS` array-and-loop convention.

use libsql::Connection;
use tracing::debug;

use crate::error::Result;

const GUARD_TABLES: &[(&str, &str)] = &[
    ("health_checks", r#"
        CREATE TABLE IF NOT EXISTS health_checks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            service TEXT NOT NULL,
            status TEXT NOT NULL,
            latency_ms INTEGER NOT NULL,
            consecutive_failures INTEGER NOT NULL DEFAULT 0,
            checked_at_ms INTEGER NOT NULL
        );
    "#),
    ("alerts", r#"
        CREATE TABLE IF NOT EXISTS alerts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            module TEXT NOT NULL,
            title TEXT NOT NULL,
            severity TEXT NOT NULL,
            detail TEXT NOT NULL,
            fired_at_ms INTEGER NOT NULL
        );
    "#),
    ("isp_scans", r#"
        CREATE TABLE IF NOT EXISTS isp_scans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            profile TEXT NOT NULL,
            valid INTEGER NOT NULL,
            tampered INTEGER NOT NULL,
            missing_fields TEXT NOT NULL DEFAULT '',
            scanned_at_ms INTEGER NOT NULL
        );
    "#),
    ("chain_checks", r#"
        CREATE TABLE IF NOT EXISTS chain_checks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rows_checked INTEGER NOT NULL,
            breaks INTEGER NOT NULL,
            checked_at_ms INTEGER NOT NULL
        );
    "#),
    ("guard_reports", r#"
        CREATE TABLE IF NOT EXISTS guard_reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            week_start_ms INTEGER NOT NULL,
            week_end_ms INTEGER NOT NULL,
            uptime_pct REAL NOT NULL,
            chain_breaks INTEGER NOT NULL,
            isp_all_valid INTEGER NOT NULL,
            verified INTEGER NOT NULL,
            generated_at_ms INTEGER NOT NULL
        );
    "#),
    ("sge_snapshots", r#"
        CREATE TABLE IF NOT EXISTS sge_snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sge REAL NOT NULL,
            recorded_at_ms INTEGER NOT NULL
        );
    "#),
    ("hash_baselines", r#"
        CREATE TABLE IF NOT EXISTS hash_baselines (
            profile TEXT PRIMARY KEY,
            baseline_hash TEXT NOT NULL,
            updated_at_ms INTEGER NOT NULL
        );
    "#),
    ("forensic_ledger", r#"
        CREATE TABLE IF NOT EXISTS forensic_ledger (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            document_id TEXT NOT NULL,
            action TEXT NOT NULL,
            actor TEXT NOT NULL,
            timestamp_ms INTEGER NOT NULL,
            domain_tag TEXT NOT NULL DEFAULT 'standard',
            current_hash TEXT NOT NULL
        );
    "#),
];

const GUARD_INDEXES: &[(&str, &str)] = &[
    ("idx_alerts_module_title", "CREATE INDEX IF NOT EXISTS idx_alerts_module_title ON alerts(module, title, fired_at_ms);"),
    ("idx_health_service", "CREATE INDEX IF NOT EXISTS idx_health_service ON health_checks(service, checked_at_ms);"),
    ("idx_ledger_domain_tag", "CREATE INDEX IF NOT EXISTS idx_ledger_domain_tag ON forensic_ledger(domain_tag);"),
];

pub async fn apply_guard_schema(db: &Connection) -> Result<()> {
    for (name, sql) in GUARD_TABLES {
        debug!("guard schema: applying {name}");
        db.execute(sql, ()).await?;
    }
    for (name, sql) in GUARD_INDEXES {
        debug!("guard schema: applying {name}");
        db.execute(sql, ()).await?;
    }
    Ok(())
}
