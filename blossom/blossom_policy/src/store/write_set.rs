//! Staged ledger writes.

use serde::Serialize;
use std::collections::BTreeMap;

use blossom_core::error::Result;

use super::Ledger;

/// Writes staged against a ledger and applied together.
///
/// Later writes to the same key replace earlier ones. Nothing touches the
/// ledger until [`WriteSet::apply`] is called.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteSet {
    /// Staged values by key. `None` marks a deletion.
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl WriteSet {
    /// Create an empty write set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a raw value.
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.writes.insert(key.into(), Some(value));
    }

    /// Stage a record serialized as JSON.
    pub fn put_record<T: Serialize>(&mut self, key: impl Into<String>, record: &T) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.put(key, bytes);
        Ok(())
    }

    /// Stage a deletion.
    pub fn delete(&mut self, key: impl Into<String>) {
        self.writes.insert(key.into(), None);
    }

    /// Number of staged writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Apply every staged write to the ledger, in key order.
    pub fn apply<L: Ledger + ?Sized>(self, ledger: &mut L) -> Result<()> {
        for (key, value) in self.writes {
            match value {
                Some(bytes) => ledger.put_state(&key, bytes)?,
                None => ledger.delete_state(&key)?,
            }
        }
        Ok(())
    }
}
