// [crates/windi-registry/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI SIGNAL REGISTRY (RFC-001)
 * CLASIFICACIÓN: SHARED KERNEL
 * RESPONSABILIDAD: MICRO-SIGNAL CATALOG, SHELF TAXONOMY, EVENT VOCABULARY
 *
 * The fixed catalog the rest of the workspace decodes against: which
 * codes exist, which shelf (S1-S7) each belongs to, and the severity
 * weight class it carries. This registry never changes at runtime —
 * a new signal code is a protocol revision, not a config change.
 * =================================================================
 */

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the seven governance shelves a Micro-Signal can report into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shelf {
    /// Decisional Concentration
    S1,
    /// Impact / Energy Gravity
    S2,
    /// Domain Friction
    S3,
    /// Governance Density
    S4,
    /// Decision Override
    S5,
    /// Temporal Dynamics
    S6,
    /// Relational Depth
    S7,
}

impl Shelf {
    pub const ALL: [Shelf; 7] = [
        Shelf::S1,
        Shelf::S2,
        Shelf::S3,
        Shelf::S4,
        Shelf::S5,
        Shelf::S6,
        Shelf::S7,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::S1 => "S1",
            Shelf::S2 => "S2",
            Shelf::S3 => "S3",
            Shelf::S4 => "S4",
            Shelf::S5 => "S5",
            Shelf::S6 => "S6",
            Shelf::S7 => "S7",
        }
    }

    pub fn parse(s: &str) -> Option<Shelf> {
        Some(match s {
            "S1" => Shelf::S1,
            "S2" => Shelf::S2,
            "S3" => Shelf::S3,
            "S4" => Shelf::S4,
            "S5" => Shelf::S5,
            "S6" => Shelf::S6,
            "S7" => Shelf::S7,
            _ => return None,
        })
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity class attached to a signal in the registry. Drives the
/// Dashboard's `by_severity` rollup and hotspot ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    /// Assigned to any signal code the registry does not recognize —
    /// never assigned to a cataloged entry.
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle or workflow event a Micro-Signal is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    DocCreated,
    ApprovalRequested,
    Approved,
    Rejected,
    ApprovalOverridden,
    DeadlineExceeded,
    DependencyLinked,
    DependencyBlocking,
    StateTransition,
}

impl Event {
    pub const ALL: [Event; 9] = [
        Event::DocCreated,
        Event::ApprovalRequested,
        Event::Approved,
        Event::Rejected,
        Event::ApprovalOverridden,
        Event::DeadlineExceeded,
        Event::DependencyLinked,
        Event::DependencyBlocking,
        Event::StateTransition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DocCreated => "DOC_CREATED",
            Event::ApprovalRequested => "APPROVAL_REQUESTED",
            Event::Approved => "APPROVED",
            Event::Rejected => "REJECTED",
            Event::ApprovalOverridden => "APPROVAL_OVERRIDDEN",
            Event::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Event::DependencyLinked => "DEPENDENCY_LINKED",
            Event::DependencyBlocking => "DEPENDENCY_BLOCKING",
            Event::StateTransition => "STATE_TRANSITION",
        }
    }

    pub fn parse(s: &str) -> Option<Event> {
        Some(match s {
            "DOC_CREATED" => Event::DocCreated,
            "APPROVAL_REQUESTED" => Event::ApprovalRequested,
            "APPROVED" => Event::Approved,
            "REJECTED" => Event::Rejected,
            "APPROVAL_OVERRIDDEN" => Event::ApprovalOverridden,
            "DEADLINE_EXCEEDED" => Event::DeadlineExceeded,
            "DEPENDENCY_LINKED" => Event::DependencyLinked,
            "DEPENDENCY_BLOCKING" => Event::DependencyBlocking,
            "STATE_TRANSITION" => Event::StateTransition,
            _ => return None,
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static metadata for a cataloged Micro-Signal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalMeta {
    pub code: &'static str,
    pub shelf: Shelf,
    pub name: &'static str,
    pub severity: Severity,
}

/// RFC-001 Micro-Signal Registry. Fourteen codes, two per shelf.
pub const SIGNAL_REGISTRY: &[SignalMeta] = &[
    SignalMeta { code: "ID-CONC", shelf: Shelf::S1, name: "Decisional Concentration", severity: Severity::High },
    SignalMeta { code: "ID-CENT", shelf: Shelf::S1, name: "Centralization Drift", severity: Severity::Medium },
    SignalMeta { code: "IMP-GRAV", shelf: Shelf::S2, name: "Energy Gravity", severity: Severity::Medium },
    SignalMeta { code: "IMP-SKEW", shelf: Shelf::S2, name: "Impact Skew", severity: Severity::Low },
    SignalMeta { code: "DOM-FRIC", shelf: Shelf::S3, name: "Interdepartmental Friction", severity: Severity::High },
    SignalMeta { code: "DOM-LOOP", shelf: Shelf::S3, name: "Circular Flow", severity: Severity::Medium },
    SignalMeta { code: "GOV-DENS", shelf: Shelf::S4, name: "Bureaucratic Density", severity: Severity::Medium },
    SignalMeta { code: "GOV-STACK", shelf: Shelf::S4, name: "Rule Stacking", severity: Severity::High },
    SignalMeta { code: "DEC-OVR", shelf: Shelf::S5, name: "Override Frequency", severity: Severity::High },
    SignalMeta { code: "DEC-INTU", shelf: Shelf::S5, name: "Intuition Bias", severity: Severity::Medium },
    SignalMeta { code: "TMP-SPIKE", shelf: Shelf::S6, name: "Quarter-End Pulse", severity: Severity::High },
    SignalMeta { code: "TMP-STALL", shelf: Shelf::S6, name: "Latency Plateau", severity: Severity::Medium },
    SignalMeta { code: "REL-DEPTH", shelf: Shelf::S7, name: "Dependency Depth", severity: Severity::Medium },
    SignalMeta { code: "REL-NODE", shelf: Shelf::S7, name: "Critical Node", severity: Severity::High },
];

/// Looks up a signal code's static metadata. Unknown codes return `None` —
/// callers fall back to `severity: unknown` and a synthesized name, they
/// do not reject the packet outright (the registry can lag a new emitter
/// firmware by design).
pub fn lookup(code: &str) -> Option<&'static SignalMeta> {
    SIGNAL_REGISTRY.iter().find(|m| m.code == code)
}

pub fn valid_shelves() -> HashSet<Shelf> {
    Shelf::ALL.into_iter().collect()
}

pub fn valid_events() -> HashSet<Event> {
    Event::ALL.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_two_codes_per_shelf() {
        for shelf in Shelf::ALL {
            let count = SIGNAL_REGISTRY.iter().filter(|m| m.shelf == shelf).count();
            assert_eq!(count, 2, "shelf {shelf} should carry exactly 2 codes");
        }
    }

    #[test]
    fn lookup_finds_known_code() {
        let meta = lookup("ID-CONC").expect("ID-CONC is cataloged");
        assert_eq!(meta.shelf, Shelf::S1);
        assert_eq!(meta.severity, Severity::High);
    }

    #[test]
    fn lookup_returns_none_for_unknown_code() {
        assert!(lookup("XX-NOPE").is_none());
    }

    #[test]
    fn shelf_round_trips_through_parse() {
        for shelf in Shelf::ALL {
            assert_eq!(Shelf::parse(shelf.as_str()), Some(shelf));
        }
        assert_eq!(Shelf::parse("S9"), None);
    }

    #[test]
    fn event_round_trips_through_parse() {
        for event in Event::ALL {
            assert_eq!(Event::parse(event.as_str()), Some(event));
        }
        assert_eq!(Event::parse("NOT_AN_EVENT"), None);
    }
}
