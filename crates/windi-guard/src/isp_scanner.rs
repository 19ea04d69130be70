// [crates/windi-guard/src/isp_scanner.rs]
//! `ISPScanner`: every 900s, validates every institutional-style profile's
//! required/recommended fields via dotted deep-path lookup, and detects
//! tamper by comparing a fresh hash of the profile against a stored
//! baseline.

use sha2::{Digest, Sha256};
use serde_json::Value;

use windi_common::now_epoch_ms;

use crate::models::{Alert, AlertSeverity, IspScanRecord};

/// An ISP profile as loaded from disk: its name, parsed JSON body (which
/// may nest fields arbitrarily deep), and raw bytes for hashing.
pub struct IspProfile {
    pub name: String,
    pub document: Value,
    pub raw_bytes: Vec<u8>,
}

pub struct IspScanner {
    required_paths: Vec<String>,
    recommended_paths: Vec<String>,
}

impl IspScanner {
    pub fn new(required_paths: Vec<String>, recommended_paths: Vec<String>) -> Self {
        IspScanner {
            required_paths,
            recommended_paths,
        }
    }

    pub fn hash_profile(profile: &IspProfile) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&profile.raw_bytes);
        format!("{:x}", hasher.finalize())
    }

    /// `baseline` is the last hash this scanner recorded for this profile,
    /// if any. Returns the scan record, an optional alert, and the hash to
    /// persist as the new baseline (unchanged when none fired).
    pub fn scan_one(&self, profile: &IspProfile, baseline: Option<&str>) -> (IspScanRecord, Option<Alert>, String) {
        let current_hash = Self::hash_profile(profile);

        let missing_required: Vec<String> = self
            .required_paths
            .iter()
            .filter(|path| deep_path_lookup(&profile.document, path).is_none())
            .cloned()
            .collect();

        let missing_recommended: Vec<String> = self
            .recommended_paths
            .iter()
            .filter(|path| deep_path_lookup(&profile.document, path).is_none())
            .cloned()
            .collect();

        let tampered = baseline.is_some_and(|b| b != current_hash);
        let valid = missing_required.is_empty() && !tampered;

        let record = IspScanRecord {
            profile: profile.name.clone(),
            valid,
            tampered,
            missing_fields: missing_required.clone(),
            scanned_at_ms: now_epoch_ms(),
        };

        let alert = if tampered {
            Some(Alert {
                module: "isp_scanner".to_string(),
                title: format!("{} profile hash mismatch", profile.name),
                severity: AlertSeverity::Critical.as_str().to_string(),
                detail: format!("baseline={:?} current={current_hash}", baseline),
                fired_at_ms: now_epoch_ms(),
            })
        } else if !missing_required.is_empty() {
            Some(Alert {
                module: "isp_scanner".to_string(),
                title: format!("{} profile missing required fields", profile.name),
                severity: AlertSeverity::Warning.as_str().to_string(),
                detail: format!("missing={missing_required:?} also_missing_recommended={missing_recommended:?}"),
                fired_at_ms: now_epoch_ms(),
            })
        } else {
            None
        };

        (record, alert, current_hash)
    }
}

/// Looks up a dotted path (`"contacts.compliance_officer.email"`) through
/// nested JSON objects. Any missing or non-object segment yields `None`.
fn deep_path_lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |acc, key| acc.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(name: &str, document: Value) -> IspProfile {
        let raw_bytes = serde_json::to_vec(&document).unwrap();
        IspProfile {
            name: name.to_string(),
            document,
            raw_bytes,
        }
    }

    fn scanner() -> IspScanner {
        IspScanner::new(
            vec!["organization.name".to_string(), "compliance.contact.email".to_string()],
            vec!["compliance.contact.phone".to_string()],
        )
    }

    #[test]
    fn a_complete_profile_with_no_baseline_is_valid_and_untampered() {
        let p = profile(
            "bafin",
            json!({"organization": {"name": "Acme"}, "compliance": {"contact": {"email": "c@acme.test"}}}),
        );
        let (record, alert, _hash) = scanner().scan_one(&p, None);
        assert!(record.valid);
        assert!(!record.tampered);
        assert!(alert.is_none());
    }

    #[test]
    fn a_profile_missing_a_required_field_is_invalid() {
        let p = profile("bafin", json!({"organization": {"name": "Acme"}}));
        let (record, alert, _hash) = scanner().scan_one(&p, None);
        assert!(!record.valid);
        assert_eq!(record.missing_fields, vec!["compliance.contact.email".to_string()]);
        assert!(alert.is_some());
    }

    #[test]
    fn a_changed_profile_is_flagged_tampered_against_its_baseline() {
        let p = profile(
            "bafin",
            json!({"organization": {"name": "Acme"}, "compliance": {"contact": {"email": "c@acme.test"}}}),
        );
        let stale_baseline = "0000000000000000000000000000000000000000000000000000000000000000";
        let (record, alert, _hash) = scanner().scan_one(&p, Some(stale_baseline));
        assert!(record.tampered);
        assert!(!record.valid);
        assert!(alert.unwrap().severity.contains("CRITICAL"));
    }
}
