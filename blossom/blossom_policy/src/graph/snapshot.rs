//! Serialized form of the attribute graph.

use serde::{Deserialize, Serialize};

use blossom_core::error::{Error, Result};

use super::{Graph, GraphResult};
use crate::model::{Node, OperationSet};

/// An assignment edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    /// The assigned node.
    pub child: String,

    /// The node it is assigned under.
    pub parent: String,
}

/// An association edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// The user-side node.
    pub source: String,

    /// The object-side node.
    pub target: String,

    /// The operations granted.
    pub operations: OperationSet,
}

/// A complete, ordered description of a graph.
///
/// Nodes are ordered by name, assignments by `(child, parent)` and
/// associations by `(source, target)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All nodes.
    pub nodes: Vec<Node>,

    /// All assignments.
    pub assignments: Vec<Assignment>,

    /// All associations.
    pub associations: Vec<Association>,
}

impl Graph {
    /// Capture the graph as a snapshot.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let nodes = self.nodes.values().cloned().collect();

        let assignments = self
            .parents
            .iter()
            .flat_map(|(child, parents)| {
                parents.iter().map(move |parent| Assignment {
                    child: child.clone(),
                    parent: parent.clone(),
                })
            })
            .collect();

        let associations = self
            .associations
            .iter()
            .flat_map(|(source, targets)| {
                targets.iter().map(move |(target, operations)| Association {
                    source: source.clone(),
                    target: target.clone(),
                    operations: operations.clone(),
                })
            })
            .collect();

        GraphSnapshot {
            nodes,
            assignments,
            associations,
        }
    }

    /// Rebuild a graph from a snapshot.
    ///
    /// The snapshot is replayed through the validating mutations, so a
    /// tampered snapshot cannot produce a graph that violates the node type
    /// rules or contains a cycle.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> GraphResult<Self> {
        let mut graph = Graph::new();

        for node in &snapshot.nodes {
            graph.create_node_with_properties(&node.name, node.node_type, node.properties.clone())?;
        }
        for assignment in &snapshot.assignments {
            graph.assign(&assignment.child, &assignment.parent)?;
        }
        for association in &snapshot.associations {
            graph.associate(
                &association.source,
                &association.target,
                association.operations.clone(),
            )?;
        }

        Ok(graph)
    }

    /// Serialize the graph to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.to_snapshot())?)
    }

    /// Deserialize a graph from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: GraphSnapshot = serde_json::from_slice(bytes)?;
        Graph::from_snapshot(&snapshot).map_err(|e| Error::Configuration(format!("invalid graph: {}", e)))
    }
}
