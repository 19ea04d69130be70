// [crates/windi-virtue-token/src/policy.rs]
//! The S-Level policy table: which signals, shelves, and temporal window a
//! Sovereignty Level sees by default, and under which visibility mode.
//!
//! Restored from the distilled spec's "a policy table" placeholder — see
//! `SPEC_FULL.md` §2.C. The exact shelf groupings are load-bearing for
//! RBAC filtering (testable property #3), unlike the resilience-score
//! weights, which are free implementation detail.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use windi_registry::{Shelf, SIGNAL_REGISTRY};

/// Sovereignty Level of a token holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SLevel {
    Tactical = 1,
    Strategic = 2,
    Sovereign = 3,
}

impl SLevel {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(v: u8) -> Option<SLevel> {
        match v {
            1 => Some(SLevel::Tactical),
            2 => Some(SLevel::Strategic),
            3 => Some(SLevel::Sovereign),
            _ => None,
        }
    }

    pub fn clearance_name(&self) -> &'static str {
        match self {
            SLevel::Tactical => "TACTICAL",
            SLevel::Strategic => "STRATEGIC",
            SLevel::Sovereign => "SOVEREIGN",
        }
    }
}

/// Shelves an L1 (tactical) token owns directly: identity, temporal,
/// relational — the shelves closest to day-to-day document work.
pub const L1_OWN_SHELVES: &[Shelf] = &[Shelf::S3, Shelf::S6, Shelf::S7];

/// Shelves an L2 (strategic) token adds on top of L1's: impact, domain
/// friction's counterpart strata, governance density, decision override —
/// the shelves that expose structural governance risk.
pub const L2_OWN_SHELVES: &[Shelf] = &[Shelf::S1, Shelf::S2, Shelf::S4, Shelf::S5];

/// Forensic-only codes visible only to L3 (sovereign) tokens — not signal
/// codes in the registry, but lineage/history views the Guard and Hold
/// components expose under the same visibility contract.
pub const L3_FORENSIC_CODES: &[&str] = &["FORENSIC_LINEAGE", "OVERRIDE_LINEAGE", "HOLD_HISTORY"];

/// Visibility mode a filtered signal is annotated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Direct,
    Aggregated,
    Historical,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Direct => "direct",
            Visibility::Aggregated => "aggregated",
            Visibility::Historical => "historical",
        }
    }
}

fn codes_for_shelves(shelves: &[Shelf]) -> HashSet<String> {
    SIGNAL_REGISTRY
        .iter()
        .filter(|meta| shelves.contains(&meta.shelf))
        .map(|meta| meta.code.to_string())
        .collect()
}

/// Default signal codes a token of `level` sees, absent any holder-specific
/// override.
pub fn default_signals(level: SLevel) -> HashSet<String> {
    match level {
        SLevel::Tactical => codes_for_shelves(L1_OWN_SHELVES),
        SLevel::Strategic => {
            let mut s = codes_for_shelves(L1_OWN_SHELVES);
            s.extend(codes_for_shelves(L2_OWN_SHELVES));
            s
        }
        SLevel::Sovereign => {
            let mut s: HashSet<String> = SIGNAL_REGISTRY.iter().map(|m| m.code.to_string()).collect();
            s.extend(L3_FORENSIC_CODES.iter().map(|c| c.to_string()));
            s
        }
    }
}

/// Derives the shelf set a token's `signals` entitle it to, by looking up
/// each code's shelf in the registry. Codes with no registry entry (the
/// L3 forensic-only codes) contribute no shelf.
pub fn derived_shelves(signals: &HashSet<String>) -> HashSet<Shelf> {
    SIGNAL_REGISTRY
        .iter()
        .filter(|meta| signals.contains(meta.code))
        .map(|meta| meta.shelf)
        .collect()
}

/// Default temporal scope, in hours. `None` means unlimited (L3).
pub fn default_temporal_scope_hours(level: SLevel) -> Option<u32> {
    match level {
        SLevel::Tactical => Some(7 * 24),
        SLevel::Strategic => Some(90 * 24),
        SLevel::Sovereign => None,
    }
}

/// `V(s_level, code)` — the visibility mode for a signal code at a given
/// clearance. Returns `None` when the combination is undefined (the
/// filter then drops the signal rather than guessing a mode).
pub fn visibility_mode(level: SLevel, code: &str) -> Option<Visibility> {
    if L3_FORENSIC_CODES.contains(&code) {
        return if level == SLevel::Sovereign {
            Some(Visibility::Historical)
        } else {
            None
        };
    }

    let meta = windi_registry::lookup(code)?;
    let is_l1_shelf = L1_OWN_SHELVES.contains(&meta.shelf);
    let is_l2_shelf = L2_OWN_SHELVES.contains(&meta.shelf);

    match level {
        SLevel::Tactical => {
            if is_l1_shelf {
                Some(Visibility::Direct)
            } else {
                None
            }
        }
        SLevel::Strategic => {
            if is_l2_shelf {
                Some(Visibility::Direct)
            } else if is_l1_shelf {
                Some(Visibility::Aggregated)
            } else {
                None
            }
        }
        SLevel::Sovereign => Some(Visibility::Historical),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tactical_signals_exclude_l2_shelves() {
        let signals = default_signals(SLevel::Tactical);
        let shelves = derived_shelves(&signals);
        assert!(!shelves.contains(&Shelf::S1));
        assert!(shelves.contains(&Shelf::S7));
    }

    #[test]
    fn strategic_adds_its_own_shelves_on_top_of_tactical() {
        let signals = default_signals(SLevel::Strategic);
        let shelves = derived_shelves(&signals);
        assert!(shelves.contains(&Shelf::S1));
        assert!(shelves.contains(&Shelf::S7));
    }

    #[test]
    fn sovereign_sees_every_registry_code_plus_forensic() {
        let signals = default_signals(SLevel::Sovereign);
        for meta in SIGNAL_REGISTRY {
            assert!(signals.contains(meta.code));
        }
        assert!(signals.contains("HOLD_HISTORY"));
    }

    #[test]
    fn visibility_mode_is_direct_for_own_shelf_aggregated_for_borrowed() {
        assert_eq!(visibility_mode(SLevel::Tactical, "REL-DEPTH"), Some(Visibility::Direct));
        assert_eq!(visibility_mode(SLevel::Strategic, "REL-DEPTH"), Some(Visibility::Aggregated));
        assert_eq!(visibility_mode(SLevel::Strategic, "ID-CONC"), Some(Visibility::Direct));
    }

    #[test]
    fn forensic_codes_are_sovereign_only() {
        assert_eq!(visibility_mode(SLevel::Sovereign, "HOLD_HISTORY"), Some(Visibility::Historical));
        assert_eq!(visibility_mode(SLevel::Strategic, "HOLD_HISTORY"), None);
    }
}
