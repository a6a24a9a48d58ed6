//! Policy decision points.
//!
//! Each decider guards the mutations of one resource domain. A mutation runs
//! inside a [`Transaction`]: the graph is loaded from the ledger, the
//! caller's privileges are decided against that graph, domain invariants are
//! checked, and only then are the graph and records changed. The new graph
//! and every record are staged and written to the ledger together on
//! [`Transaction::commit`]. A transaction dropped before commit leaves the
//! ledger untouched.

pub mod account;
pub mod asset;
pub mod swid;

pub use account::AccountDecider;
pub use asset::AssetDecider;
pub use swid::SwIDDecider;

use serde::de::DeserializeOwned;
use serde::Serialize;

use blossom_core::error::{Error, Result};
use blossom_core::log_event;
use blossom_core::types::Identity;
use blossom_core::utils::{LogLevel, PolicyConfig};

use crate::engine::PolicyEvaluator;
use crate::graph::Graph;
use crate::model::Operation;
use crate::pap;
use crate::store::{self, Ledger, WriteSet, GRAPH_KEY};

/// Load the policy graph from the ledger.
///
/// # Returns
///
/// * `Ok(Graph)` - The stored graph.
/// * `Err(Error::Configuration)` - If no graph has been stored yet.
pub fn load_graph<L: Ledger + ?Sized>(ledger: &L) -> Result<Graph> {
    let bytes = ledger
        .get_state(GRAPH_KEY)?
        .ok_or_else(|| Error::Configuration("policy graph has not been initialized".to_string()))?;
    Graph::from_bytes(&bytes)
}

/// Store the policy skeleton in an empty ledger.
pub fn initialize<L: Ledger + ?Sized>(ledger: &mut L, config: &PolicyConfig) -> Result<()> {
    if ledger.get_state(GRAPH_KEY)?.is_some() {
        return Err(Error::Configuration(
            "policy graph is already initialized".to_string(),
        ));
    }

    let graph = pap::bootstrap(config)?;
    ledger.put_state(GRAPH_KEY, graph.to_bytes()?)?;

    log_event!(LogLevel::Info, "Ledger initialized", nodes => graph.len());
    Ok(())
}

/// A single decide-then-mutate unit of work against a ledger.
pub struct Transaction<'l, L: Ledger + ?Sized> {
    ledger: &'l mut L,
    identity: Identity,
    graph: Graph,
    writes: WriteSet,
}

impl<'l, L: Ledger + ?Sized> Transaction<'l, L> {
    /// Begin a transaction on behalf of `identity`.
    pub fn begin(ledger: &'l mut L, identity: &Identity) -> Result<Self> {
        let graph = load_graph(&*ledger)?;
        Ok(Self {
            ledger,
            identity: identity.clone(),
            graph,
            writes: WriteSet::new(),
        })
    }

    /// The caller.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The graph as loaded, plus any changes made so far.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the graph for the PAPs.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// An evaluator over the transaction's graph.
    pub fn evaluator(&self) -> PolicyEvaluator<'_> {
        PolicyEvaluator::new(&self.graph)
    }

    /// Fail with `PermissionDenied` unless the caller holds `operation` on `target`.
    pub fn require(&self, target: &str, operation: Operation) -> Result<()> {
        let result = self
            .evaluator()
            .check(self.identity.as_str(), target, operation);

        if result.is_err() {
            log_event!(LogLevel::Info, "Request denied",
                identity => self.identity,
                operation => operation,
                target => target,
            );
        }
        result
    }

    /// Read a record from the ledger.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        store::get_record(&*self.ledger, key)
    }

    /// Stage a record to be written on commit.
    pub fn stage<T: Serialize>(&mut self, key: impl Into<String>, record: &T) -> Result<()> {
        self.writes.put_record(key, record)
    }

    /// Stage the deletion of a record.
    pub fn stage_delete(&mut self, key: impl Into<String>) {
        self.writes.delete(key);
    }

    /// Write the graph and every staged record to the ledger.
    pub fn commit(self) -> Result<()> {
        let Self {
            ledger,
            identity,
            graph,
            mut writes,
        } = self;

        writes.put(GRAPH_KEY, graph.to_bytes()?);
        let count = writes.len();
        writes.apply(ledger)?;

        log_event!(LogLevel::Debug, "Transaction committed",
            identity => identity,
            writes => count,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryLedger;

    #[test]
    fn test_initialize_once() {
        let mut ledger = InMemoryLedger::new();
        initialize(&mut ledger, &PolicyConfig::default()).unwrap();

        let graph = load_graph(&ledger).unwrap();
        assert!(graph.contains("super:BlossomMSP"));

        assert!(matches!(
            initialize(&mut ledger, &PolicyConfig::default()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_uninitialized_ledger() {
        let mut ledger = InMemoryLedger::new();
        let identity = Identity::from("super:BlossomMSP");
        assert!(matches!(
            Transaction::begin(&mut ledger, &identity),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_dropped_transaction_writes_nothing() {
        let mut ledger = InMemoryLedger::new();
        initialize(&mut ledger, &PolicyConfig::default()).unwrap();
        let before = ledger.clone();

        let identity = Identity::from("super:BlossomMSP");
        let mut tx = Transaction::begin(&mut ledger, &identity).unwrap();
        tx.stage("asset/a1", &"pending").unwrap();
        tx.graph_mut().remove_node(pap::policy::SUPER_UA).unwrap();
        drop(tx);

        assert_eq!(ledger, before);
    }

    #[test]
    fn test_commit_writes_graph_and_records() {
        let mut ledger = InMemoryLedger::new();
        initialize(&mut ledger, &PolicyConfig::default()).unwrap();

        let identity = Identity::from("super:BlossomMSP");
        let mut tx = Transaction::begin(&mut ledger, &identity).unwrap();
        tx.require(pap::policy::ASSETS_OA, Operation::OnboardAsset)
            .unwrap();
        tx.stage("asset/a1", &"record").unwrap();
        tx.graph_mut()
            .create_node("extra", crate::model::NodeType::PolicyClass)
            .unwrap();
        tx.commit().unwrap();

        assert!(load_graph(&ledger).unwrap().contains("extra"));
        assert_eq!(
            ledger.get_state("asset/a1").unwrap(),
            Some(b"\"record\"".to_vec())
        );
    }

    #[test]
    fn test_require_denies_strangers() {
        let mut ledger = InMemoryLedger::new();
        initialize(&mut ledger, &PolicyConfig::default()).unwrap();

        let identity = Identity::from("mallory:EvilMSP");
        let tx = Transaction::begin(&mut ledger, &identity).unwrap();
        assert!(matches!(
            tx.require(pap::policy::ASSETS_OA, Operation::OnboardAsset),
            Err(Error::Policy(_))
        ));
    }
}
