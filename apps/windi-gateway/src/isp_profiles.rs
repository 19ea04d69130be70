// [apps/windi-gateway/src/isp_profiles.rs]
//! Loads Information Sharing Partner profiles from disk for the Guard's
//! `IspScanner` — each `*.json` file under `WINDI_ISP_PROFILES_DIR` becomes
//! one `IspProfile`, named after its file stem.

use std::path::PathBuf;

use tracing::warn;
use windi_guard::IspProfile;

pub struct IspProfileLoader {
    dir: PathBuf,
}

impl IspProfileLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        IspProfileLoader { dir: dir.into() }
    }
}

impl windi_guard::IspProfileSource for IspProfileLoader {
    fn load_profiles(&self) -> Vec<IspProfile> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %self.dir.display(), error = %err, "isp profiles directory unreadable");
                return Vec::new();
            }
        };

        let mut profiles = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw_bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to read isp profile");
                    continue;
                }
            };
            let document = match serde_json::from_slice(&raw_bytes) {
                Ok(document) => document,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "isp profile is not valid json");
                    continue;
                }
            };
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();
            profiles.push(IspProfile { name, document, raw_bytes });
        }
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windi_guard::IspProfileSource;

    #[test]
    fn reads_every_json_file_in_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("partner-a.json"), r#"{"organization":{"name":"Partner A"}}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let loader = IspProfileLoader::new(dir.path());
        let profiles = loader.load_profiles();

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "partner-a");
    }

    #[test]
    fn a_missing_directory_yields_no_profiles() {
        let loader = IspProfileLoader::new("/nonexistent/path/does-not-exist");
        assert!(loader.load_profiles().is_empty());
    }
}
