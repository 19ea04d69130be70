// [crates/windi-bridge/src/aggregator.rs]
//! Multi-tenant signal aggregation with shelf-indexed dashboards. One lock
//! covers the deque, the per-shelf indexes, and the statistics together —
//! a snapshot read must see all three as of the same instant.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use windi_common::now_epoch_ms;
use windi_registry::{Severity, Shelf};

use crate::decoded::DecodedSignal;

/// Capacity of the bounded deque of decoded signals (`M` in the data model).
pub const DEQUE_CAPACITY: usize = 5_000;

/// Window size for hotspot ranking (top-5 by weight over the last N).
const HOTSPOT_WINDOW: usize = 200;

/// Size of the `live_feed` slice returned in a dashboard snapshot.
const LIVE_FEED_SIZE: usize = 20;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Totals {
    pub received: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShelfHealth {
    pub count: u64,
    pub avg_weight: f64,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub snapshot_ts: i64,
    pub totals: Totals,
    pub by_shelf: HashMap<String, u64>,
    pub by_severity: HashMap<String, u64>,
    pub by_event: HashMap<String, u64>,
    pub shelf_health: HashMap<String, ShelfHealth>,
    pub hotspots: Vec<DecodedSignal>,
    pub live_feed: Vec<DecodedSignal>,
}

struct ShelfAccumulator {
    count: u64,
    weight_sum: i64,
}

impl ShelfAccumulator {
    fn new() -> Self {
        ShelfAccumulator { count: 0, weight_sum: 0 }
    }

    fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.weight_sum as f64 / self.count as f64
        }
    }
}

struct Inner {
    deque: std::collections::VecDeque<DecodedSignal>,
    by_shelf_signals: HashMap<Shelf, Vec<DecodedSignal>>,
    totals: Totals,
    by_shelf_counts: HashMap<Shelf, ShelfAccumulator>,
    by_severity_counts: HashMap<Severity, u64>,
    by_event_counts: HashMap<String, u64>,
}

impl Inner {
    fn new() -> Self {
        Inner {
            deque: std::collections::VecDeque::with_capacity(DEQUE_CAPACITY),
            by_shelf_signals: HashMap::new(),
            totals: Totals::default(),
            by_shelf_counts: HashMap::new(),
            by_severity_counts: HashMap::new(),
            by_event_counts: HashMap::new(),
        }
    }
}

/// In-memory aggregator. All reads copy out from under the lock — callers
/// never hold a reference into aggregator-owned memory.
pub struct Aggregator {
    inner: Mutex<Inner>,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator {
            inner: Mutex::new(Inner::new()),
        }
    }

    pub fn record_rejected(&self) {
        let mut inner = self.inner.lock().expect("aggregator lock poisoned");
        inner.totals.rejected += 1;
    }

    pub fn ingest(&self, signal: DecodedSignal) {
        let mut inner = self.inner.lock().expect("aggregator lock poisoned");

        inner.totals.received += 1;

        let shelf_acc = inner.by_shelf_counts.entry(signal.shelf).or_insert_with(ShelfAccumulator::new);
        shelf_acc.count += 1;
        shelf_acc.weight_sum += signal.weight;

        *inner.by_severity_counts.entry(signal.severity).or_insert(0) += 1;
        *inner.by_event_counts.entry(signal.event.as_str().to_string()).or_insert(0) += 1;

        inner
            .by_shelf_signals
            .entry(signal.shelf)
            .or_default()
            .push(signal.clone());

        if inner.deque.len() >= DEQUE_CAPACITY {
            if let Some(evicted) = inner.deque.pop_front() {
                if let Some(shelf_list) = inner.by_shelf_signals.get_mut(&evicted.shelf) {
                    if let Some(pos) = shelf_list.iter().position(|s| {
                        s.client_id_hash == evicted.client_id_hash && s.seq == evicted.seq
                    }) {
                        shelf_list.remove(pos);
                    }
                }
            }
        }
        inner.deque.push_back(signal);
    }

    /// Last `limit` decoded signals for one shelf, newest last — backs
    /// `GET /api/v1/shelf/{S1..S7}`.
    pub fn shelf_detail(&self, shelf: Shelf, limit: usize) -> Vec<DecodedSignal> {
        let inner = self.inner.lock().expect("aggregator lock poisoned");
        match inner.by_shelf_signals.get(&shelf) {
            Some(list) => list.iter().rev().take(limit).rev().cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let inner = self.inner.lock().expect("aggregator lock poisoned");
        let snapshot_ts = now_epoch_ms();

        let by_shelf: HashMap<String, u64> = inner
            .by_shelf_counts
            .iter()
            .map(|(shelf, acc)| (shelf.as_str().to_string(), acc.count))
            .collect();

        let by_severity: HashMap<String, u64> = inner
            .by_severity_counts
            .iter()
            .map(|(sev, count)| (sev.as_str().to_string(), *count))
            .collect();

        let by_event = inner.by_event_counts.clone();

        let shelf_health: HashMap<String, ShelfHealth> = inner
            .by_shelf_counts
            .iter()
            .map(|(shelf, acc)| {
                let avg = acc.avg();
                let status = if avg > 75.0 {
                    "critical"
                } else if avg > 50.0 {
                    "warning"
                } else {
                    "healthy"
                };
                (
                    shelf.as_str().to_string(),
                    ShelfHealth {
                        count: acc.count,
                        avg_weight: avg,
                        status,
                    },
                )
            })
            .collect();

        let window: Vec<&DecodedSignal> = inner.deque.iter().rev().take(HOTSPOT_WINDOW).collect();
        let mut hotspots: Vec<DecodedSignal> = window.into_iter().cloned().collect();
        hotspots.sort_by(|a, b| b.weight.cmp(&a.weight));
        hotspots.truncate(5);

        let live_feed: Vec<DecodedSignal> = inner.deque.iter().rev().take(LIVE_FEED_SIZE).rev().cloned().collect();

        DashboardSnapshot {
            snapshot_ts,
            totals: inner.totals.clone(),
            by_shelf,
            by_severity,
            by_event,
            shelf_health,
            hotspots,
            live_feed,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windi_registry::Event;

    fn signal(shelf: Shelf, weight: i64, seq: u64) -> DecodedSignal {
        DecodedSignal {
            client_id_hash: "c1".to_string(),
            kid: "k1".to_string(),
            ts: 0,
            seq,
            shelf,
            code: "ID-CONC".to_string(),
            weight,
            event: Event::Approved,
            domain_hash: "dh".to_string(),
            doc_fingerprint: "df".to_string(),
            signal_name: "Decisional Concentration".to_string(),
            severity: windi_registry::Severity::High,
        }
    }

    #[test]
    fn ingest_increments_totals_and_shelf_counts() {
        let agg = Aggregator::new();
        agg.ingest(signal(Shelf::S1, 70, 1));
        let snap = agg.snapshot();
        assert_eq!(snap.totals.received, 1);
        assert_eq!(snap.by_shelf.get("S1"), Some(&1));
    }

    #[test]
    fn shelf_health_status_thresholds() {
        let agg = Aggregator::new();
        agg.ingest(signal(Shelf::S1, 70, 1));
        let snap = agg.snapshot();
        assert_eq!(snap.shelf_health["S1"].status, "warning");

        let agg2 = Aggregator::new();
        agg2.ingest(signal(Shelf::S2, 80, 1));
        let snap2 = agg2.snapshot();
        assert_eq!(snap2.shelf_health["S2"].status, "critical");
    }

    #[test]
    fn deque_eviction_respects_capacity() {
        let agg = Aggregator::new();
        for i in 0..(DEQUE_CAPACITY + 10) {
            agg.ingest(signal(Shelf::S3, 10, i as u64));
        }
        let snap = agg.snapshot();
        assert_eq!(snap.totals.received, (DEQUE_CAPACITY + 10) as u64);
    }

    #[test]
    fn hotspots_are_top_five_by_weight() {
        let agg = Aggregator::new();
        for (i, w) in [10, 90, 30, 80, 20, 100].into_iter().enumerate() {
            agg.ingest(signal(Shelf::S4, w, i as u64));
        }
        let snap = agg.snapshot();
        assert_eq!(snap.hotspots.len(), 5);
        assert_eq!(snap.hotspots[0].weight, 100);
    }
}
