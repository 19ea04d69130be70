// [crates/windi-guard/src/guard.rs]
//! The Governance Guard composition root: owns the six sub-modules and
//! spawns each on its own independent `tokio::time::interval` task. A
//! failing probe is logged at its own sub-module boundary and never stops
//! the others (§5).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::error;

use windi_common::now_epoch_ms;

use crate::alert_engine::AlertEngine;
use crate::chain_watcher::ChainWatcher;
use crate::flow_monitor::FlowMonitor;
use crate::health_probe::HealthProbe;
use crate::isp_scanner::{IspProfile, IspScanner};
use crate::models::{GuardReport, PendingSubmission, ServiceTarget};
use crate::report_builder::ReportBuilder;
use crate::storage::GuardRepository;

const HEALTH_INTERVAL: Duration = Duration::from_secs(120);
const CHAIN_INTERVAL: Duration = Duration::from_secs(300);
const ISP_INTERVAL: Duration = Duration::from_secs(900);
const FLOW_INTERVAL: Duration = Duration::from_secs(600);
const REPORT_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Supplies the pending-submission queue and the current governance
/// efficacy score, in-process, for the `FlowMonitor` — reading this never
/// performs network I/O, only a lock over whatever state the gateway
/// binary owns.
pub trait FlowSource: Send + Sync {
    fn pending_submissions(&self) -> Vec<PendingSubmission>;
    fn current_sge(&self) -> f64;
}

/// Supplies the current set of ISP profiles for the `ISPScanner`, reloaded
/// every tick so a file changed on disk between scans is detected.
pub trait IspProfileSource: Send + Sync {
    fn load_profiles(&self) -> Vec<IspProfile>;
}

pub struct Guard {
    repository: Arc<GuardRepository>,
    health_probe: HealthProbe,
    chain_watcher: ChainWatcher,
    isp_scanner: IspScanner,
    flow_monitor: FlowMonitor,
    report_builder: ReportBuilder,
    alert_engine: Arc<AlertEngine>,
    flow_source: Arc<dyn FlowSource>,
    isp_source: Arc<dyn IspProfileSource>,
}

impl Guard {
    pub fn new(
        repository: Arc<GuardRepository>,
        service_targets: Vec<ServiceTarget>,
        isp_required_fields: Vec<String>,
        isp_recommended_fields: Vec<String>,
        war_room_url: Option<String>,
        flow_source: Arc<dyn FlowSource>,
        isp_source: Arc<dyn IspProfileSource>,
    ) -> Self {
        Guard {
            alert_engine: Arc::new(AlertEngine::new(repository.clone(), war_room_url)),
            health_probe: HealthProbe::new(service_targets),
            chain_watcher: ChainWatcher::new(),
            isp_scanner: IspScanner::new(isp_required_fields, isp_recommended_fields),
            flow_monitor: FlowMonitor::new(),
            report_builder: ReportBuilder::new(),
            repository,
            flow_source,
            isp_source,
        }
    }

    pub fn spawn_all(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        vec![
            self.clone().spawn_health_loop(),
            self.clone().spawn_chain_loop(),
            self.clone().spawn_isp_loop(),
            self.clone().spawn_flow_loop(),
            self.clone().spawn_report_loop(),
        ]
    }

    fn spawn_health_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(HEALTH_INTERVAL);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_health_probe().await {
                    error!(error = %e, "health probe tick failed");
                }
            }
        })
    }

    fn spawn_chain_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(CHAIN_INTERVAL);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_chain_watcher().await {
                    error!(error = %e, "chain watcher tick failed");
                }
            }
        })
    }

    fn spawn_isp_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(ISP_INTERVAL);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_isp_scan().await {
                    error!(error = %e, "isp scanner tick failed");
                }
            }
        })
    }

    fn spawn_flow_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FLOW_INTERVAL);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_flow_monitor().await {
                    error!(error = %e, "flow monitor tick failed");
                }
            }
        })
    }

    fn spawn_report_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(REPORT_INTERVAL);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_report_builder().await {
                    error!(error = %e, "report builder tick failed");
                }
            }
        })
    }

    async fn run_health_probe(&self) -> crate::error::Result<()> {
        for (record, alert) in self.health_probe.run_once().await {
            self.repository.insert_health_check(&record).await?;
            if let Some(alert) = alert {
                self.alert_engine.fire(alert).await?;
            }
        }
        Ok(())
    }

    async fn run_chain_watcher(&self) -> crate::error::Result<()> {
        let rows = self.repository.ledger_rows().await?;
        let (record, alert) = self.chain_watcher.run_once(&rows);
        self.repository.insert_chain_check(&record).await?;
        if let Some(alert) = alert {
            self.alert_engine.fire(alert).await?;
        }
        Ok(())
    }

    async fn run_isp_scan(&self) -> crate::error::Result<()> {
        for profile in self.isp_source.load_profiles() {
            let baseline = self.repository.get_hash_baseline(&profile.name).await?;
            let (record, alert, fresh_hash) = self.isp_scanner.scan_one(&profile, baseline.as_deref());
            self.repository.insert_isp_scan(&record).await?;
            if baseline.is_none() || !record.tampered {
                self.repository.set_hash_baseline(&profile.name, &fresh_hash, now_epoch_ms()).await?;
            }
            if let Some(alert) = alert {
                self.alert_engine.fire(alert).await?;
            }
        }
        Ok(())
    }

    async fn run_flow_monitor(&self) -> crate::error::Result<()> {
        let pending = self.flow_source.pending_submissions();
        let current_sge = self.flow_source.current_sge();
        let previous_sge = self.repository.previous_sge().await?;
        let now_ms = now_epoch_ms();

        self.repository
            .insert_sge_snapshot(&crate::models::SgeSnapshot {
                sge: current_sge,
                recorded_at_ms: now_ms,
            })
            .await?;

        for alert in self.flow_monitor.run_once(&pending, current_sge, previous_sge, now_ms) {
            self.alert_engine.fire(alert).await?;
        }
        Ok(())
    }

    async fn run_report_builder(&self) -> crate::error::Result<GuardReport> {
        let now_ms = now_epoch_ms();
        let week_start_ms = now_ms - 7 * 24 * 60 * 60 * 1000;

        let rows = self.repository.ledger_rows().await?;
        let (chain_check, _) = self.chain_watcher.run_once(&rows);

        let isp_profiles = self.isp_source.load_profiles();
        let mut isp_all_valid = true;
        for profile in &isp_profiles {
            let baseline = self.repository.get_hash_baseline(&profile.name).await?;
            let (record, _, _) = self.isp_scanner.scan_one(profile, baseline.as_deref());
            isp_all_valid &= record.valid;
        }

        let uptime_pct = self.repository.uptime_pct_since(week_start_ms).await?;

        let report = self.report_builder.build(week_start_ms, uptime_pct, chain_check.breaks, isp_all_valid);
        self.repository.insert_guard_report(&report).await?;
        Ok(report)
    }
}
