// [crates/windi-virtue-token/src/token.rs]
//! The Virtue Token: a JWT-like bearer credential mapping a holder's
//! Sovereignty Level to the signals, shelves, and temporal window they
//! may observe.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use windi_registry::Shelf;

use crate::policy::{default_signals, default_temporal_scope_hours, derived_shelves, SLevel};

/// Draft inputs to token issuance. Anything left `None` is completed from
/// `policy::default_*` for the given `s_level`.
#[derive(Debug, Clone)]
pub struct TokenDraft {
    pub sub: String,
    pub s_level: SLevel,
    pub domains: Vec<String>,
    pub kill_switch_authority: bool,
    pub signals: Option<HashSet<String>>,
    pub shelves: Option<HashSet<Shelf>>,
    pub temporal_scope_hours: Option<Option<u32>>,
}

/// The token payload — the part that gets signed. `iat`/`exp`/`nonce` are
/// filled in by the issuer, never supplied by the draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtueToken {
    pub sub: String,
    pub s_level: u8,
    pub domains: Vec<String>,
    pub kill_switch_authority: bool,
    pub signals: Vec<String>,
    pub shelves: Vec<String>,
    /// Hours, or `None` for unlimited (L3).
    pub temporal_scope_hours: Option<u32>,
    pub clearance: String,
    pub iat: i64,
    pub exp: i64,
    pub nonce: String,
}

impl VirtueToken {
    pub fn s_level(&self) -> SLevel {
        SLevel::from_u8(self.s_level).expect("a validated token always carries a valid s_level")
    }

    pub fn signals_set(&self) -> HashSet<String> {
        self.signals.iter().cloned().collect()
    }

    pub fn shelves_set(&self) -> HashSet<Shelf> {
        self.shelves.iter().filter_map(|s| Shelf::parse(s)).collect()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now > self.exp
    }
}

/// Completes a draft into the fields that get signed, applying the policy
/// defaults and the §3 invariant that `kill_switch_authority` is forced
/// false below L2.
pub fn complete_draft(draft: TokenDraft, iat: i64, nonce: String) -> VirtueToken {
    let signals = draft.signals.unwrap_or_else(|| default_signals(draft.s_level));
    let shelves = draft
        .shelves
        .unwrap_or_else(|| derived_shelves(&signals))
        .into_iter()
        .map(|s| s.as_str().to_string())
        .collect();

    let temporal_scope_hours = draft
        .temporal_scope_hours
        .unwrap_or_else(|| default_temporal_scope_hours(draft.s_level));

    // The token's own bearer lifetime is fixed at 24h regardless of
    // `temporal_scope_hours`, which instead bounds how far back into
    // history the holder may query once authenticated.
    let exp = iat + 24 * 60 * 60 * 1000;

    VirtueToken {
        sub: draft.sub,
        s_level: draft.s_level.as_u8(),
        domains: draft.domains,
        kill_switch_authority: draft.kill_switch_authority && draft.s_level.as_u8() >= 2,
        signals: signals.into_iter().collect(),
        shelves,
        temporal_scope_hours,
        clearance: draft.s_level.clearance_name().to_string(),
        iat,
        exp,
        nonce,
    }
}

/// Wire shape: `{header, payload, signature}`, matching spec.md §3's
/// Signed Token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTokenHeader {
    pub alg: String,
    pub typ: String,
    pub v: String,
}

impl Default for SignedTokenHeader {
    fn default() -> Self {
        SignedTokenHeader {
            alg: "HS256".to_string(),
            typ: "VirtueToken".to_string(),
            v: "1.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedToken {
    pub header: SignedTokenHeader,
    pub payload: VirtueToken,
    pub signature: String,
}
