//! Mail record type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "id";
/// Field matched by inbox queries.
pub const RECIPIENT_FIELD: &str = "recipient";
/// Field matched by sent-mail queries.
pub const SENDER_FIELD: &str = "sender";

/// A stored mail entry: a flat map of field name to string value.
///
/// Everything except `id` is supplied by the caller. The store overwrites
/// `id` on creation, so a caller-provided value never survives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MailRecord {
    fields: BTreeMap<String, String>,
}

impl MailRecord {
    /// Create an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get(ID_FIELD)
    }

    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.get(SENDER_FIELD)
    }

    #[must_use]
    pub fn recipient(&self) -> Option<&str> {
        self.get(RECIPIENT_FIELD)
    }

    /// Look up any field by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(field.into(), value.into())
    }

    pub(crate) fn assign_id(&mut self, id: String) {
        self.fields.insert(ID_FIELD.to_string(), id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for MailRecord {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MailRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
