// [crates/windi-guard/src/alert_engine.rs]
//! `AlertEngine`: event-driven. Deduplicates `(module, title)` within a
//! 5-minute window, persists every admitted alert, and makes a best-effort
//! POST to the war-room endpoint — dispatch failure is logged, never
//! escalated.

use std::time::Duration;

use tracing::{error, info};

use crate::models::Alert;
use crate::storage::GuardRepository;

const DEDUP_WINDOW_MS: i64 = 5 * 60 * 1000;
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

pub struct AlertEngine {
    repository: std::sync::Arc<GuardRepository>,
    war_room_url: Option<String>,
    client: reqwest::Client,
}

impl AlertEngine {
    pub fn new(repository: std::sync::Arc<GuardRepository>, war_room_url: Option<String>) -> Self {
        AlertEngine {
            repository,
            war_room_url,
            client: reqwest::Client::builder()
                .timeout(DISPATCH_TIMEOUT)
                .build()
                .expect("reqwest client with a fixed timeout always builds"),
        }
    }

    /// Returns `true` if the alert was admitted (new), `false` if it was a
    /// duplicate within the dedup window and silently dropped.
    pub async fn fire(&self, alert: Alert) -> crate::error::Result<bool> {
        if self
            .repository
            .recent_alert(&alert.module, &alert.title, alert.fired_at_ms, DEDUP_WINDOW_MS)
            .await?
            .is_some()
        {
            info!(module = %alert.module, title = %alert.title, "alert deduplicated");
            return Ok(false);
        }

        self.repository.insert_alert(&alert).await?;
        self.dispatch_best_effort(&alert).await;
        Ok(true)
    }

    async fn dispatch_best_effort(&self, alert: &Alert) {
        let Some(url) = &self.war_room_url else { return };
        if let Err(e) = self.client.post(url).json(alert).send().await {
            error!(error = %e, "war-room dispatch failed, alert remains persisted locally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertSeverity;
    use crate::storage::{GuardDb, GuardRepository};

    async fn engine() -> AlertEngine {
        let db = GuardDb::connect(":memory:", None).await.unwrap();
        AlertEngine::new(std::sync::Arc::new(GuardRepository::new(db)), None)
    }

    fn alert(title: &str, ts: i64) -> Alert {
        Alert {
            module: "health_probe".to_string(),
            title: title.to_string(),
            severity: AlertSeverity::Critical.as_str().to_string(),
            detail: "detail".to_string(),
            fired_at_ms: ts,
        }
    }

    #[tokio::test]
    async fn a_second_identical_alert_within_the_window_is_deduplicated() {
        let engine = engine().await;
        assert!(engine.fire(alert("bridge down", 1_000)).await.unwrap());
        assert!(!engine.fire(alert("bridge down", 1_000 + 60_000)).await.unwrap());
    }

    #[tokio::test]
    async fn an_identical_alert_outside_the_window_is_admitted_again() {
        let engine = engine().await;
        assert!(engine.fire(alert("bridge down", 1_000)).await.unwrap());
        assert!(engine.fire(alert("bridge down", 1_000 + 6 * 60_000)).await.unwrap());
    }
}
