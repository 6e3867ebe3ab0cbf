//! Mail store: record lifecycle over a pluggable snapshot backend.

use crate::error::Result;
use crate::json_store::JsonFileStorage;
use crate::record::MailRecord;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError, RwLock};
use uuid::Uuid;

/// Persistence backend holding the full record snapshot.
///
/// `load` and `save` must each be atomic: a concurrent `load` observes either
/// the previous snapshot or the new one, never a mix.
pub trait MailStorage: Send + Sync {
    /// Read the full snapshot. A backend with no snapshot yet returns an empty list.
    fn load(&self) -> Result<Vec<MailRecord>>;

    /// Replace the snapshot with `records`.
    fn save(&self, records: &[MailRecord]) -> Result<()>;
}

/// In-memory snapshot backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<Vec<MailRecord>>,
}

impl MemoryStorage {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Start from an existing snapshot.
    #[must_use]
    pub const fn with_records(records: Vec<MailRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl MailStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<MailRecord>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, records: &[MailRecord]) -> Result<()> {
        *self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner) = records.to_vec();
        Ok(())
    }
}

type IdGenerator = Box<dyn Fn() -> String + Send + Sync>;

/// The mail store.
///
/// Every operation reads the whole snapshot from the backend; mutations write
/// the whole snapshot back. Mutations hold `write_lock` across
/// load-mutate-save so concurrent creates and deletes cannot lose updates.
pub struct MailStore {
    backend: Box<dyn MailStorage>,
    next_id: IdGenerator,
    write_lock: Mutex<()>,
}

impl MailStore {
    /// Create a store over `backend` that assigns random v4 UUIDs.
    pub fn new(backend: impl MailStorage + 'static) -> Self {
        Self::with_id_generator(backend, || Uuid::new_v4().to_string())
    }

    /// Create a store with a custom id generator.
    ///
    /// The store never checks generated ids against existing records, so the
    /// generator must not repeat itself.
    pub fn with_id_generator(
        backend: impl MailStorage + 'static,
        next_id: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            backend: Box::new(backend),
            next_id: Box::new(next_id),
            write_lock: Mutex::new(()),
        }
    }

    /// Open a store persisted to the JSON file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileStorage::new(path))
    }

    /// Read every stored record, in insertion order.
    pub fn load(&self) -> Result<Vec<MailRecord>> {
        self.backend.load()
    }

    /// Replace the stored records with `records`.
    pub fn save(&self, records: &[MailRecord]) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.backend.save(records)
    }

    /// Store a new record and return its assigned id.
    pub fn create(&self, mut entry: MailRecord) -> Result<String> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.backend.load()?;

        let id = (self.next_id)();
        entry.assign_id(id.clone());
        records.push(entry);
        self.backend.save(&records)?;

        tracing::debug!(%id, total = records.len(), "created mail");
        Ok(id)
    }

    /// Remove the record with `id`. Returns false, without touching storage,
    /// when no such record exists.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.backend.load()?;

        let Some(pos) = records.iter().position(|r| r.id() == Some(id)) else {
            tracing::debug!(%id, "delete of unknown mail");
            return Ok(false);
        };
        records.remove(pos);
        self.backend.save(&records)?;

        tracing::debug!(%id, total = records.len(), "deleted mail");
        Ok(true)
    }

    /// Fetch a record by id.
    pub fn get(&self, id: &str) -> Result<Option<MailRecord>> {
        Ok(self
            .backend
            .load()?
            .into_iter()
            .find(|r| r.id() == Some(id)))
    }

    /// All records addressed to `recipient` (exact, case-sensitive match).
    pub fn list_by_recipient(&self, recipient: &str) -> Result<Vec<MailRecord>> {
        self.filter(|r| r.recipient() == Some(recipient))
    }

    /// All records sent by `sender` (exact, case-sensitive match).
    pub fn list_by_sender(&self, sender: &str) -> Result<Vec<MailRecord>> {
        self.filter(|r| r.sender() == Some(sender))
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        Ok(self.backend.load()?.len())
    }

    fn filter(&self, keep: impl Fn(&MailRecord) -> bool) -> Result<Vec<MailRecord>> {
        Ok(self.backend.load()?.into_iter().filter(keep).collect())
    }
}
