//! # Blossom Policy
//!
//! `blossom_policy` implements Next Generation Access Control over a
//! license sharing ledger. Access is decided by the structure of an
//! attribute graph rather than by rule lists.
//!
//! Key concepts:
//!
//! 1. **Attribute Graph**: Typed nodes joined by assignments, plus
//!    associations that grant operations from user-side to object-side nodes.
//!
//! 2. **Policy Class**: A root of the graph. Grants are unioned within a
//!    policy class and intersected across the classes governing a target.
//!
//! 3. **Policy Administration Point (PAP)**: Translates domain events into
//!    graph mutations.
//!
//! 4. **Policy Decision Point (PDP)**: Decides whether a caller may perform
//!    a mutation, then applies it through a PAP and commits it to the ledger.

pub mod engine;
pub mod graph;
pub mod model;
pub mod pap;
pub mod pdp;
pub mod store;

// Re-export key types and traits for convenience
pub use engine::{filter, PolicyEvaluator, Privileges, Redactable};
pub use graph::{Graph, GraphSnapshot};
pub use model::{Decision, Node, NodeType, Operation, OperationSet};
pub use pap::{AccountPap, AssetPap, SwIDPap};
pub use pdp::{AccountDecider, AssetDecider, SwIDDecider, Transaction};
pub use store::{InMemoryLedger, Ledger, WriteSet};
