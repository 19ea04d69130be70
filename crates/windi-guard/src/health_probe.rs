// [crates/windi-guard/src/health_probe.rs]
//! `HealthProbe`: HTTP-polls a fixed set of services every 120s and tracks
//! a consecutive-failure counter per service, escalating a `critical`
//! service's severity to EMERGENCY at the third consecutive failure.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::warn;

use windi_common::now_epoch_ms;

use crate::models::{Alert, AlertSeverity, HealthCheckRecord, ServiceStatus, ServiceTarget};

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const ESCALATION_THRESHOLD: u32 = 3;

pub struct HealthProbe {
    targets: Vec<ServiceTarget>,
    client: reqwest::Client,
    consecutive_failures: Mutex<HashMap<String, u32>>,
}

impl HealthProbe {
    pub fn new(targets: Vec<ServiceTarget>) -> Self {
        HealthProbe {
            targets,
            client: reqwest::Client::builder()
                .timeout(PROBE_TIMEOUT)
                .build()
                .expect("reqwest client with a fixed timeout always builds"),
            consecutive_failures: Mutex::new(HashMap::new()),
        }
    }

    /// Probes every target once. Returns one `HealthCheckRecord` per
    /// target, paired with an `Alert` when the status is DOWN or DEGRADED.
    pub async fn run_once(&self) -> Vec<(HealthCheckRecord, Option<Alert>)> {
        let mut out = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            out.push(self.probe_one(target).await);
        }
        out
    }

    async fn probe_one(&self, target: &ServiceTarget) -> (HealthCheckRecord, Option<Alert>) {
        let url = format!("{}{}", target.base_url, target.path);
        let started = now_epoch_ms();
        let outcome = self.client.get(&url).send().await;
        let latency_ms = now_epoch_ms() - started;

        let status = match &outcome {
            Ok(resp) if resp.status().is_success() => ServiceStatus::Ok,
            Ok(_) => ServiceStatus::Degraded,
            Err(_) => ServiceStatus::Down,
        };

        let consecutive_failures = {
            let mut counters = self.consecutive_failures.lock().expect("health probe counter lock poisoned");
            let entry = counters.entry(target.name.clone()).or_insert(0);
            if matches!(status, ServiceStatus::Ok) {
                *entry = 0;
            } else {
                *entry += 1;
            }
            *entry
        };

        let record = HealthCheckRecord {
            service: target.name.clone(),
            status: status.as_str().to_string(),
            latency_ms,
            consecutive_failures,
            checked_at_ms: now_epoch_ms(),
        };

        let alert = match status {
            ServiceStatus::Ok => None,
            ServiceStatus::Degraded => Some(Alert {
                module: "health_probe".to_string(),
                title: format!("{} degraded", target.name),
                severity: AlertSeverity::Warning.as_str().to_string(),
                detail: format!("{} responded without a success status", url),
                fired_at_ms: now_epoch_ms(),
            }),
            ServiceStatus::Down => {
                let severity = if target.critical && consecutive_failures >= ESCALATION_THRESHOLD {
                    AlertSeverity::Emergency
                } else {
                    AlertSeverity::Critical
                };
                warn!(service = %target.name, consecutive_failures, "health probe failure");
                Some(Alert {
                    module: "health_probe".to_string(),
                    title: format!("{} down", target.name),
                    severity: severity.as_str().to_string(),
                    detail: format!("{} consecutive failures probing {}", consecutive_failures, url),
                    fired_at_ms: now_epoch_ms(),
                })
            }
        };

        (record, alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, critical: bool) -> ServiceTarget {
        ServiceTarget {
            name: name.to_string(),
            base_url: "http://127.0.0.1:1".to_string(), // nothing listens here
            path: "/health".to_string(),
            critical,
        }
    }

    #[tokio::test]
    async fn a_critical_service_escalates_to_emergency_on_the_third_failure() {
        let probe = HealthProbe::new(vec![target("bridge", true)]);

        let mut last_alert = None;
        for _ in 0..3 {
            let results = probe.run_once().await;
            last_alert = results.into_iter().next().and_then(|(_, alert)| alert);
        }

        let alert = last_alert.expect("a down service always alerts");
        assert_eq!(alert.severity, AlertSeverity::Emergency.as_str());
    }

    #[tokio::test]
    async fn a_non_critical_service_never_escalates_past_critical() {
        let probe = HealthProbe::new(vec![target("sidecar", false)]);

        let mut last_alert = None;
        for _ in 0..5 {
            let results = probe.run_once().await;
            last_alert = results.into_iter().next().and_then(|(_, alert)| alert);
        }

        let alert = last_alert.expect("a down service always alerts");
        assert_eq!(alert.severity, AlertSeverity::Critical.as_str());
    }
}
