// [crates/windi-guard/src/flow_monitor.rs]
//! `FlowMonitor`: every 600s, flags pending submissions stuck longer than
//! 48h and emits an SGE-drift warning when the governance efficacy score
//! swings by 5+ points or falls below 70.

use windi_common::now_epoch_ms;

use crate::models::{Alert, AlertSeverity, PendingSubmission};

const STALENESS_THRESHOLD_MS: i64 = 48 * 60 * 60 * 1000;
const SGE_DRIFT_THRESHOLD: f64 = 5.0;
const SGE_FLOOR: f64 = 70.0;

pub struct FlowMonitor;

impl FlowMonitor {
    pub fn new() -> Self {
        FlowMonitor
    }

    pub fn stale_submissions<'a>(&self, pending: &'a [PendingSubmission], now_ms: i64) -> Vec<&'a PendingSubmission> {
        pending
            .iter()
            .filter(|p| now_ms - p.created_at_ms > STALENESS_THRESHOLD_MS)
            .collect()
    }

    pub fn run_once(&self, pending: &[PendingSubmission], current_sge: f64, previous_sge: Option<f64>, now_ms: i64) -> Vec<Alert> {
        let mut alerts = Vec::new();

        let stale = self.stale_submissions(pending, now_ms);
        if !stale.is_empty() {
            alerts.push(Alert {
                module: "flow_monitor".to_string(),
                title: "submissions stalled past 48h".to_string(),
                severity: AlertSeverity::Warning.as_str().to_string(),
                detail: format!(
                    "stale_ids={:?}",
                    stale.iter().map(|p| p.submission_id.clone()).collect::<Vec<_>>()
                ),
                fired_at_ms: now_ms,
            });
        }

        if current_sge < SGE_FLOOR {
            alerts.push(Alert {
                module: "flow_monitor".to_string(),
                title: "SGE below floor".to_string(),
                severity: AlertSeverity::Critical.as_str().to_string(),
                detail: format!("sge={current_sge} floor={SGE_FLOOR}"),
                fired_at_ms: now_ms,
            });
        } else if let Some(previous) = previous_sge {
            if (current_sge - previous).abs() >= SGE_DRIFT_THRESHOLD {
                alerts.push(Alert {
                    module: "flow_monitor".to_string(),
                    title: "SGE drift".to_string(),
                    severity: AlertSeverity::Warning.as_str().to_string(),
                    detail: format!("previous={previous} current={current_sge}"),
                    fired_at_ms: now_ms,
                });
            }
        }

        alerts
    }
}

impl Default for FlowMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: &str, created_at_ms: i64) -> PendingSubmission {
        PendingSubmission {
            submission_id: id.to_string(),
            created_at_ms,
        }
    }

    #[test]
    fn a_submission_older_than_48h_is_flagged_stale() {
        let now = 100 * 60 * 60 * 1000;
        let pending = vec![submission("SUB-OLD", now - 49 * 60 * 60 * 1000), submission("SUB-NEW", now - 60_000)];
        let monitor = FlowMonitor::new();
        let stale = monitor.stale_submissions(&pending, now);
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].submission_id, "SUB-OLD");
    }

    #[test]
    fn sge_below_floor_fires_critical_regardless_of_drift() {
        let monitor = FlowMonitor::new();
        let alerts = monitor.run_once(&[], 65.0, Some(66.0), 1_000);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "SGE below floor");
    }

    #[test]
    fn a_five_point_swing_fires_a_drift_warning() {
        let monitor = FlowMonitor::new();
        let alerts = monitor.run_once(&[], 80.0, Some(74.0), 1_000);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "SGE drift");
    }

    #[test]
    fn a_small_change_fires_nothing() {
        let monitor = FlowMonitor::new();
        let alerts = monitor.run_once(&[], 80.0, Some(78.0), 1_000);
        assert!(alerts.is_empty());
    }
}
