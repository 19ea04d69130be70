// [crates/windi-provenance/src/store.rs]
//! Atomic on-disk persistence for provenance records: a per-submission
//! JSON file plus a single rewritten index, per §5's "single-writer
//! convention" — this component is single-instance per process.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ProvenanceError, Result};
use crate::record::{GovernanceLevel, ProvenanceRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub record_path: String,
    pub structural_hash: String,
    pub governance_level: String,
    pub resilience_score: u8,
    pub updated_at: String,
    pub prov_version: String,
}

/// Filesystem-backed provenance store rooted at a configurable directory
/// (`WINDI_PROVENANCE_DIR` in the original; threaded explicitly here so
/// tests can point it at a `tempfile::TempDir`).
pub struct ProvenanceStore {
    records_dir: PathBuf,
    index_file: PathBuf,
}

impl ProvenanceStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        ProvenanceStore {
            records_dir: root.join("records"),
            index_file: root.join("index.json"),
        }
    }

    fn ensure_storage(&self) -> Result<()> {
        fs::create_dir_all(&self.records_dir)?;
        Ok(())
    }

    fn safe_write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(data)?;
        fs::write(&tmp, body)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load_index(&self) -> HashMap<String, IndexEntry> {
        fs::read_to_string(&self.index_file)
            .ok()
            .and_then(|body| serde_json::from_str(&body).ok())
            .unwrap_or_default()
    }

    fn update_index(&self, submission_id: &str, entry: IndexEntry) -> Result<()> {
        let mut idx = self.load_index();
        idx.insert(submission_id.to_string(), entry);
        Self::safe_write_json(&self.index_file, &idx)
    }

    /// Stores `record` according to its governance level's persistence
    /// rule. Returns the path written, or `None` if the record is LOW and
    /// not forced (submission_id not prefixed `FORCE-`).
    pub fn persist(&self, record: &ProvenanceRecord) -> Result<Option<PathBuf>> {
        let level = record.governance_context.level.as_str();
        if level == GovernanceLevel::Low.as_str() && !record.submission_id.starts_with("FORCE-") {
            return Ok(None);
        }

        self.ensure_storage()?;

        let safe_id = record.submission_id.replace(['/', '\\'], "_");
        let path = self.records_dir.join(format!("{safe_id}.json"));
        Self::safe_write_json(&path, record)?;

        self.update_index(
            &record.submission_id,
            IndexEntry {
                record_path: path.to_string_lossy().into_owned(),
                structural_hash: record.cryptographic_proof.structural_hash.clone(),
                governance_level: level.to_string(),
                resilience_score: record.deepfake_resilience.score,
                updated_at: Utc::now().to_rfc3339(),
                prov_version: record.provenance_version.clone(),
            },
        )?;

        Ok(Some(path))
    }

    /// Forces persistence regardless of level, used for the `FORCE-`
    /// submission-id convention on LOW records.
    pub fn persist_forced(&self, record: &ProvenanceRecord) -> Result<PathBuf> {
        self.ensure_storage()?;
        let safe_id = record.submission_id.replace(['/', '\\'], "_");
        let path = self.records_dir.join(format!("{safe_id}.json"));
        Self::safe_write_json(&path, record)?;
        self.update_index(
            &record.submission_id,
            IndexEntry {
                record_path: path.to_string_lossy().into_owned(),
                structural_hash: record.cryptographic_proof.structural_hash.clone(),
                governance_level: record.governance_context.level.clone(),
                resilience_score: record.deepfake_resilience.score,
                updated_at: Utc::now().to_rfc3339(),
                prov_version: record.provenance_version.clone(),
            },
        )?;
        Ok(path)
    }

    pub fn load(&self, submission_id: &str) -> Option<ProvenanceRecord> {
        let idx = self.load_index();
        let entry = idx.get(submission_id)?;
        let body = fs::read_to_string(&entry.record_path).ok()?;
        serde_json::from_str(&body).ok()
    }

    pub fn load_raw(&self, submission_id: &str) -> Option<serde_json::Value> {
        let idx = self.load_index();
        let entry = idx.get(submission_id)?;
        let body = fs::read_to_string(&entry.record_path).ok()?;
        serde_json::from_str(&body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{build_provenance_record, BuildRecordInput};
    use serde_json::json;
    use tempfile::tempdir;

    fn sample(level: GovernanceLevel, submission_id: Option<&str>) -> ProvenanceRecord {
        build_provenance_record(BuildRecordInput {
            submission_id: submission_id.map(str::to_string),
            governance_level: level,
            policy_version: "2.2.0".to_string(),
            config_hash: "cfg".to_string(),
            isp_profile: "bafin".to_string(),
            organization: "Acme".to_string(),
            metadata: json!({}),
            identity_governance: None,
            content: None,
            content_hash: None,
        })
    }

    #[test]
    fn high_records_are_always_persisted() {
        let dir = tempdir().unwrap();
        let store = ProvenanceStore::new(dir.path());
        let record = sample(GovernanceLevel::High, Some("SUB-HIGH"));
        let path = store.persist(&record).unwrap();
        assert!(path.is_some());
        assert!(store.load("SUB-HIGH").is_some());
    }

    #[test]
    fn low_records_are_not_persisted_without_force_prefix() {
        let dir = tempdir().unwrap();
        let store = ProvenanceStore::new(dir.path());
        let record = sample(GovernanceLevel::Low, Some("SUB-LOW"));
        let path = store.persist(&record).unwrap();
        assert!(path.is_none());
        assert!(store.load("SUB-LOW").is_none());
    }

    #[test]
    fn low_records_with_force_prefix_are_persisted() {
        let dir = tempdir().unwrap();
        let store = ProvenanceStore::new(dir.path());
        let record = sample(GovernanceLevel::Low, Some("FORCE-SUB-LOW"));
        let path = store.persist(&record).unwrap();
        assert!(path.is_some());
        assert!(store.load("FORCE-SUB-LOW").is_some());
    }
}
