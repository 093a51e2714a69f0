//! Backup blob: export and import of the profile store's contents.
//!
//! The blob is a JSON object `{profiles, favorite_profiles, exported_at}`.
//! File reads take a shared lock; writes go through an exclusively locked
//! temp file that is atomically renamed over the target.

use crate::store::ProfileStore;
use crate::types::ExamProfile;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialized snapshot of a [`ProfileStore`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreBackup {
    pub profiles: BTreeMap<String, ExamProfile>,
    pub favorite_profiles: Vec<String>,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
}

impl ProfileStore {
    /// Snapshot the store for export, stamping the export time
    pub fn to_backup(&self) -> StoreBackup {
        StoreBackup {
            profiles: self.profiles().clone(),
            favorite_profiles: self.favorites().iter().cloned().collect(),
            exported_at: Some(Utc::now()),
        }
    }

    /// Replace the store's contents wholesale with a backup's
    pub fn restore(&mut self, backup: StoreBackup) {
        let favorites = backup.favorite_profiles.into_iter().collect();
        self.replace(backup.profiles, favorites);
        tracing::info!("store restored from backup ({} profiles)", self.len());
    }
}

impl StoreBackup {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a backup blob.
    ///
    /// Both `profiles` and `favorite_profiles` must be present or the
    /// blob is rejected as invalid; `exported_at` is optional.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::InvalidBackup("not a JSON object".to_string()))?;

        for key in ["profiles", "favorite_profiles"] {
            if !object.contains_key(key) {
                return Err(Error::InvalidBackup(format!("missing '{key}'")));
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Load a backup from a file with shared locking.
    ///
    /// A missing file is `Ok(None)`. A file that cannot be read or
    /// parsed logs a warning and is also `Ok(None)`, so a damaged
    /// session file never blocks startup.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::info!("no profile data at {:?}, starting fresh", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("unable to open {:?}: {}. Starting fresh.", path, e);
                return Ok(None);
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("unable to lock {:?}: {}. Starting fresh.", path, e);
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("failed to read {:?}: {}. Starting fresh.", path, e);
            return Ok(None);
        }
        file.unlock()?;

        match Self::from_json(&contents) {
            Ok(backup) => {
                tracing::debug!("loaded {} profiles from {:?}", backup.profiles.len(), path);
                Ok(Some(backup))
            }
            Err(e) => {
                tracing::warn!("failed to parse {:?}: {}. Starting fresh.", path, e);
                Ok(None)
            }
        }
    }

    /// Save the backup with exclusive locking.
    ///
    /// Writes to a temp file in the target directory, syncs, then
    /// atomically renames over the target.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "backup path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(self.to_json()?.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        tracing::debug!("saved profile data to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;

    fn seeded_store() -> ProfileStore {
        let catalog = build_default_catalog();
        let mut store = ProfileStore::with_defaults(&catalog);
        store.toggle_favorite("ROTINA").unwrap();
        store
    }

    #[test]
    fn test_json_roundtrip() {
        let store = seeded_store();

        let json = store.to_backup().to_json().unwrap();
        let parsed = StoreBackup::from_json(&json).unwrap();

        let mut restored = ProfileStore::new();
        restored.restore(parsed);

        assert_eq!(restored.len(), 3);
        assert!(restored.is_favorite("ROTINA"));
        assert_eq!(
            restored.peek("ROTINA").unwrap(),
            store.peek("ROTINA").unwrap()
        );
    }

    #[test]
    fn test_import_requires_both_keys() {
        let missing_favorites = r#"{"profiles": {}}"#;
        let err = StoreBackup::from_json(missing_favorites).unwrap_err();
        assert!(matches!(err, Error::InvalidBackup(msg) if msg.contains("favorite_profiles")));

        let missing_profiles = r#"{"favorite_profiles": []}"#;
        let err = StoreBackup::from_json(missing_profiles).unwrap_err();
        assert!(matches!(err, Error::InvalidBackup(msg) if msg.contains("profiles")));

        let not_an_object = r#"[1, 2, 3]"#;
        assert!(StoreBackup::from_json(not_an_object).is_err());
    }

    #[test]
    fn test_import_without_exported_at() {
        let raw = r#"{"profiles": {}, "favorite_profiles": []}"#;
        let backup = StoreBackup::from_json(raw).unwrap();
        assert!(backup.exported_at.is_none());
        assert!(backup.profiles.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profiles.json");

        seeded_store().to_backup().save(&path).unwrap();
        let loaded = StoreBackup::load(&path).unwrap().unwrap();

        assert_eq!(loaded.profiles.len(), 3);
        assert_eq!(loaded.favorite_profiles, vec!["ROTINA".to_string()]);
        assert!(loaded.exported_at.is_some());
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.json");
        assert!(StoreBackup::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_corrupted_file_is_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrupted.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        assert!(StoreBackup::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_save_leaves_no_stray_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profiles.json");

        seeded_store().to_backup().save(&path).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "profiles.json")
            .collect();
        assert!(extras.is_empty(), "expected only profiles.json, found {extras:?}");
    }
}
