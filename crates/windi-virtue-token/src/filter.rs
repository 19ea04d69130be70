// [crates/windi-virtue-token/src/filter.rs]
//! The signal filter: invoked on every aggregator read before
//! serialization. No visibility decision is ever delegated to the
//! client — every dashboard handler calls through here server-side.

use std::collections::HashMap;

use serde::Serialize;

use windi_bridge::{DashboardSnapshot, DecodedSignal, ShelfHealth};

use crate::policy::visibility_mode;
use crate::token::VirtueToken;

#[derive(Debug, Clone, Serialize)]
pub struct FilteredSignal {
    #[serde(flatten)]
    pub signal: DecodedSignal,
    #[serde(rename = "_visibility")]
    pub visibility: &'static str,
    #[serde(rename = "_s_level")]
    pub s_level: u8,
}

fn annotate(signal: &DecodedSignal, token: &VirtueToken) -> Option<FilteredSignal> {
    if !token.signals_set().contains(&signal.code) {
        return None;
    }
    if !token.shelves_set().contains(&signal.shelf) {
        return None;
    }
    let visibility = visibility_mode(token.s_level(), &signal.code)?;
    Some(FilteredSignal {
        signal: signal.clone(),
        visibility: visibility.as_str(),
        s_level: token.s_level,
    })
}

/// Filters a flat list of decoded signals down to what `token` may see.
pub fn filter_signals(signals: &[DecodedSignal], token: &VirtueToken) -> Vec<FilteredSignal> {
    signals.iter().filter_map(|s| annotate(s, token)).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenMeta {
    pub s_level: u8,
    pub clearance: String,
    pub sub: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilteredDashboard {
    pub snapshot_ts: i64,
    pub totals: windi_bridge::Totals,
    pub by_shelf: HashMap<String, u64>,
    pub by_severity: HashMap<String, u64>,
    pub by_event: HashMap<String, u64>,
    pub shelf_health: HashMap<String, ShelfHealth>,
    pub hotspots: Vec<FilteredSignal>,
    pub live_feed: Vec<FilteredSignal>,
    #[serde(rename = "_token_meta")]
    pub token_meta: TokenMeta,
}

/// Filters a full dashboard snapshot: shelf-indexed maps and the
/// feed/hotspot arrays are filtered identically to `filter_signals`, and
/// a `_token_meta` block is appended.
pub fn filter_dashboard(snapshot: &DashboardSnapshot, token: &VirtueToken) -> FilteredDashboard {
    let visible_shelves: Vec<String> = token.shelves_set().iter().map(|s| s.as_str().to_string()).collect();

    let by_shelf = snapshot
        .by_shelf
        .iter()
        .filter(|(shelf, _)| visible_shelves.contains(shelf))
        .map(|(k, v)| (k.clone(), *v))
        .collect();

    let shelf_health = snapshot
        .shelf_health
        .iter()
        .filter(|(shelf, _)| visible_shelves.contains(shelf))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    FilteredDashboard {
        snapshot_ts: snapshot.snapshot_ts,
        totals: snapshot.totals.clone(),
        by_shelf,
        by_severity: snapshot.by_severity.clone(),
        by_event: snapshot.by_event.clone(),
        shelf_health,
        hotspots: filter_signals(&snapshot.hotspots, token),
        live_feed: filter_signals(&snapshot.live_feed, token),
        token_meta: TokenMeta {
            s_level: token.s_level,
            clearance: token.clearance.clone(),
            sub: token.sub.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::TokenIssuer;
    use crate::policy::SLevel;
    use crate::token::TokenDraft;
    use windi_registry::{Event, Severity, Shelf};

    fn signal(shelf: Shelf, code: &str) -> DecodedSignal {
        DecodedSignal {
            client_id_hash: "c1".to_string(),
            kid: "k1".to_string(),
            ts: 0,
            seq: 1,
            shelf,
            code: code.to_string(),
            weight: 50,
            event: Event::Approved,
            domain_hash: "dh".to_string(),
            doc_fingerprint: "df".to_string(),
            signal_name: "n".to_string(),
            severity: Severity::Medium,
        }
    }

    fn token_for(level: SLevel) -> VirtueToken {
        let issuer = TokenIssuer::new(b"secret".to_vec());
        let signed = issuer.issue(TokenDraft {
            sub: "u1".to_string(),
            s_level: level,
            domains: vec!["*".to_string()],
            kill_switch_authority: false,
            signals: None,
            shelves: None,
            temporal_scope_hours: None,
        });
        signed.payload
    }

    #[test]
    fn l1_token_excludes_l2_owned_shelves() {
        let token = token_for(SLevel::Tactical);
        let signals = vec![signal(Shelf::S1, "ID-CONC"), signal(Shelf::S7, "REL-NODE")];
        let filtered = filter_signals(&signals, &token);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].signal.code, "REL-NODE");
        assert_eq!(filtered[0].visibility, "direct");
    }

    #[test]
    fn l2_token_sees_l1_shelves_as_aggregated() {
        let token = token_for(SLevel::Strategic);
        let signals = vec![signal(Shelf::S7, "REL-NODE")];
        let filtered = filter_signals(&signals, &token);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].visibility, "aggregated");
    }

    #[test]
    fn unknown_code_not_in_token_signals_is_dropped() {
        let token = token_for(SLevel::Tactical);
        let signals = vec![signal(Shelf::S7, "NOT-A-REAL-CODE")];
        assert!(filter_signals(&signals, &token).is_empty());
    }
}
