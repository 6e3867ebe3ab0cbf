//! JSON file snapshot backend.

use crate::error::{Error, Result};
use crate::record::MailRecord;
use crate::store::MailStorage;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores the whole record set as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn encode(records: &[MailRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut ser)
        .map_err(|e| Error::Encode(e.to_string()))?;
    buf.push(b'\n');
    Ok(buf)
}

impl MailStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<MailRecord>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&content).map_err(|e| {
            tracing::error!(path = %self.path.display(), "unreadable mail snapshot: {e}");
            Error::DataCorruption(format!("{}: {e}", self.path.display()))
        })
    }

    fn save(&self, records: &[MailRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file, then rename over the snapshot
        let temp_path = self.temp_path();
        fs::write(&temp_path, encode(records)?)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MailStore;
    use tempfile::TempDir;

    fn storage() -> (TempDir, JsonFileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("mail_db.json"));
        (dir, storage)
    }

    fn mail(sender: &str, recipient: &str) -> MailRecord {
        [("sender", sender), ("recipient", recipient)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let (_dir, storage) = storage();
        assert!(storage.load().unwrap().is_empty());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, storage) = storage();
        let records = vec![mail("a", "b"), mail("c", "d")];

        storage.save(&records).unwrap();
        assert_eq!(storage.load().unwrap(), records);
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_snapshot_is_indented_array() {
        let (_dir, storage) = storage();
        storage.save(&[mail("a", "b")]).unwrap();

        let text = fs::read_to_string(storage.path()).unwrap();
        assert_eq!(
            text,
            "[\n    {\n        \"recipient\": \"b\",\n        \"sender\": \"a\"\n    }\n]\n"
        );
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/deeper/mail_db.json"));

        storage.save(&[]).unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (_dir, storage) = storage();
        fs::write(storage.path(), "{ not json").unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, Error::DataCorruption(_)));
        assert!(err.to_string().contains("mail_db.json"));
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        let (_dir, storage) = storage();
        fs::write(storage.path(), r#"[{"sender": 1}]"#).unwrap();
        assert!(matches!(storage.load(), Err(Error::DataCorruption(_))));

        fs::write(storage.path(), r#"{"sender": "a"}"#).unwrap();
        assert!(matches!(storage.load(), Err(Error::DataCorruption(_))));
    }

    #[test]
    fn test_unknown_delete_leaves_file_untouched() {
        let (dir, _) = storage();
        let path = dir.path().join("mail_db.json");
        let store = MailStore::open(&path);
        store.create(mail("a", "b")).unwrap();
        store.create(mail("c", "d")).unwrap();

        let before = fs::read(&path).unwrap();
        assert!(!store.delete("never-created").unwrap());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_store_state_survives_reopen() {
        let (dir, _) = storage();
        let path = dir.path().join("mail_db.json");

        let id = MailStore::open(&path).create(mail("a", "b")).unwrap();

        let reopened = MailStore::open(&path);
        let record = reopened.get(&id).unwrap().unwrap();
        assert_eq!(record.sender(), Some("a"));
        assert_eq!(reopened.list_by_recipient("b").unwrap().len(), 1);
    }
}
