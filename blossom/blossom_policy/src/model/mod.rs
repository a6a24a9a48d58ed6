//! Policy models.
//!
//! This module defines the node, operation and decision types the graph
//! and the engine are built from.

pub mod decision;
pub mod node;
pub mod operation;

pub use decision::Decision;
pub use node::{Node, NodeType, Properties};
pub use operation::{Domain, Operation, OperationSet};
