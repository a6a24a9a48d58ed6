//! Ledger storage.
//!
//! The policy graph and the domain records live in a key/value ledger. The
//! graph is stored under [`GRAPH_KEY`]; records are stored as JSON under a
//! prefix per record type.

mod in_memory;
mod write_set;

pub use in_memory::InMemoryLedger;
pub use write_set::WriteSet;

use serde::de::DeserializeOwned;

use blossom_core::error::Result;

/// Key of the serialized policy graph.
pub const GRAPH_KEY: &str = "ngac-graph";

/// Key prefix of asset records.
pub const ASSET_PREFIX: &str = "asset/";

/// Key prefix of account records.
pub const ACCOUNT_PREFIX: &str = "account/";

/// Key prefix of SwID records.
pub const SWID_PREFIX: &str = "swid/";

/// Key of an asset record.
pub fn asset_key(id: &str) -> String {
    format!("{}{}", ASSET_PREFIX, id)
}

/// Key of an account record.
pub fn account_key(name: &str) -> String {
    format!("{}{}", ACCOUNT_PREFIX, name)
}

/// Key of a SwID record.
pub fn swid_key(primary_tag: &str) -> String {
    format!("{}{}", SWID_PREFIX, primary_tag)
}

/// Trait for ledger storage.
///
/// A ledger is an ordered key/value store. Writes issued through a
/// [`WriteSet`] become visible together when the set is applied.
pub trait Ledger {
    /// Get the value stored under a key.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to read.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - The stored value.
    /// * `Ok(None)` - If nothing is stored under the key.
    /// * `Err` - If the ledger could not be read.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value under a key, replacing any previous value.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to write.
    /// * `value` - The value to store.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the value was stored.
    /// * `Err` - If the ledger could not be written.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Delete the value stored under a key.
    ///
    /// Deleting a missing key is not an error.
    fn delete_state(&mut self, key: &str) -> Result<()>;

    /// List the keys starting with a prefix, in ascending order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Read and deserialize a record.
pub fn get_record<L, T>(ledger: &L, key: &str) -> Result<Option<T>>
where
    L: Ledger + ?Sized,
    T: DeserializeOwned,
{
    match ledger.get_state(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Read and deserialize every record under a prefix, in key order.
pub fn records_with_prefix<L, T>(ledger: &L, prefix: &str) -> Result<Vec<T>>
where
    L: Ledger + ?Sized,
    T: DeserializeOwned,
{
    let mut records = Vec::new();
    for key in ledger.keys_with_prefix(prefix)? {
        if let Some(record) = get_record(ledger, &key)? {
            records.push(record);
        }
    }
    Ok(records)
}
