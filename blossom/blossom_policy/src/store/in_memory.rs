//! In-memory ledger.
//!
//! This module provides an in-memory implementation of the ledger.

use std::collections::BTreeMap;

use blossom_core::error::Result;

use super::Ledger;

/// An in-memory ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    /// The values, indexed by key.
    state: BTreeMap<String, Vec<u8>>,
}

impl InMemoryLedger {
    /// Create a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl Ledger for InMemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.state.insert(key.to_string(), value);
        Ok(())
    }

    fn delete_state(&mut self, key: &str) -> Result<()> {
        self.state.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        // Keys are ordered, so everything with the prefix is one contiguous range
        Ok(self
            .state
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}
