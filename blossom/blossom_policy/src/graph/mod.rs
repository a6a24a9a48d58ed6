//! Attribute graph store.
//!
//! The graph holds typed nodes, assignment edges (child to parent) and
//! association edges (user-side to object-side, labelled with an operation
//! set). Every mutation validates the node types involved, and assignments
//! are rejected if they would close a cycle, so the graph is always a DAG.
//!
//! All collections are ordered maps keyed by node name. Enumeration order is
//! therefore lexicographic and two graphs holding the same state serialize
//! to the same bytes.

mod snapshot;

pub use snapshot::{Assignment, Association, GraphSnapshot};

use std::collections::{BTreeMap, BTreeSet};

use blossom_core::error::GraphError;
use blossom_core::log_event;
use blossom_core::utils::LogLevel;

use crate::model::{Node, NodeType, OperationSet, Properties};

/// Result type for graph mutations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// The attribute graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    /// Nodes by name.
    nodes: BTreeMap<String, Node>,

    /// Assignment parents by child.
    parents: BTreeMap<String, BTreeSet<String>>,

    /// Assignment children by parent.
    children: BTreeMap<String, BTreeSet<String>>,

    /// Association operation sets by source, then target.
    associations: BTreeMap<String, BTreeMap<String, OperationSet>>,

    /// Association sources by target.
    associated_from: BTreeMap<String, BTreeSet<String>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a node without properties.
    ///
    /// # Arguments
    ///
    /// * `name` - The unique name of the node.
    /// * `node_type` - The type of the node.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the node was created.
    /// * `Err(GraphError::DuplicateNode)` - If a node with that name exists.
    pub fn create_node(&mut self, name: &str, node_type: NodeType) -> GraphResult<()> {
        self.create_node_with_properties(name, node_type, Properties::new())
    }

    /// Create a node with properties.
    pub fn create_node_with_properties(
        &mut self,
        name: &str,
        node_type: NodeType,
        properties: Properties,
    ) -> GraphResult<()> {
        if self.nodes.contains_key(name) {
            return Err(GraphError::DuplicateNode(name.to_string()));
        }

        log_event!(LogLevel::Trace, "Node created", name => name, node_type => node_type);

        self.nodes.insert(
            name.to_string(),
            Node {
                name: name.to_string(),
                node_type,
                properties,
            },
        );
        Ok(())
    }

    /// Assign `child` under `parent`.
    ///
    /// Assigning an already assigned pair is a no-op.
    ///
    /// # Arguments
    ///
    /// * `child` - The node being assigned.
    /// * `parent` - The node it is assigned under.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the assignment exists after the call.
    /// * `Err(GraphError::UnknownNode)` - If either node is missing.
    /// * `Err(GraphError::InvalidAssignment)` - If the node types cannot be assigned.
    /// * `Err(GraphError::CycleDetected)` - If the assignment would close a cycle.
    pub fn assign(&mut self, child: &str, parent: &str) -> GraphResult<()> {
        let child_type = self.require_node(child)?.node_type;
        let parent_type = self.require_node(parent)?.node_type;

        if !child_type.can_assign_to(parent_type) {
            return Err(GraphError::InvalidAssignment {
                child: child.to_string(),
                child_type: child_type.to_string(),
                parent: parent.to_string(),
                parent_type: parent_type.to_string(),
            });
        }

        if self.is_assigned(child, parent) {
            return Ok(());
        }

        if child == parent || self.ascendants(parent).contains(child) {
            return Err(GraphError::CycleDetected {
                child: child.to_string(),
                parent: parent.to_string(),
            });
        }

        self.parents
            .entry(child.to_string())
            .or_default()
            .insert(parent.to_string());
        self.children
            .entry(parent.to_string())
            .or_default()
            .insert(child.to_string());
        Ok(())
    }

    /// Remove the assignment of `child` under `parent`.
    ///
    /// Removing an assignment that does not exist is a no-op.
    pub fn deassign(&mut self, child: &str, parent: &str) -> GraphResult<()> {
        self.require_node(child)?;
        self.require_node(parent)?;

        remove_edge(&mut self.parents, child, parent);
        remove_edge(&mut self.children, parent, child);
        Ok(())
    }

    /// Associate a user-side node with an object-side node.
    ///
    /// Associating an already associated pair replaces its operation set.
    ///
    /// # Arguments
    ///
    /// * `from` - A user or user attribute.
    /// * `to` - An object or object attribute.
    /// * `operations` - The operations granted. Must not be empty.
    pub fn associate(&mut self, from: &str, to: &str, operations: OperationSet) -> GraphResult<()> {
        let from_type = self.require_node(from)?.node_type;
        let to_type = self.require_node(to)?.node_type;

        if !from_type.is_user_side() || !to_type.is_object_side() {
            return Err(GraphError::InvalidAssociationEndpoints {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if operations.is_empty() {
            return Err(GraphError::EmptyOperationSet {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.associations
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), operations);
        self.associated_from
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        Ok(())
    }

    /// Remove the association between `from` and `to`.
    ///
    /// Removing an association that does not exist is a no-op.
    pub fn dissociate(&mut self, from: &str, to: &str) -> GraphResult<()> {
        self.require_node(from)?;
        self.require_node(to)?;

        if let Some(targets) = self.associations.get_mut(from) {
            targets.remove(to);
            if targets.is_empty() {
                self.associations.remove(from);
            }
        }
        remove_edge(&mut self.associated_from, to, from);
        Ok(())
    }

    /// Remove a node along with every edge that references it.
    pub fn remove_node(&mut self, name: &str) -> GraphResult<Node> {
        let node = self
            .nodes
            .remove(name)
            .ok_or_else(|| GraphError::UnknownNode(name.to_string()))?;

        for parent in self.parents.remove(name).unwrap_or_default() {
            remove_edge(&mut self.children, &parent, name);
        }
        for child in self.children.remove(name).unwrap_or_default() {
            remove_edge(&mut self.parents, &child, name);
        }
        for target in self.associations.remove(name).unwrap_or_default().into_keys() {
            remove_edge(&mut self.associated_from, &target, name);
        }
        for source in self.associated_from.remove(name).unwrap_or_default() {
            if let Some(targets) = self.associations.get_mut(&source) {
                targets.remove(name);
                if targets.is_empty() {
                    self.associations.remove(&source);
                }
            }
        }

        log_event!(LogLevel::Trace, "Node removed", name => name);

        Ok(node)
    }

    /// Get a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Whether a node with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Whether `name` exists and has the given type.
    pub fn has_node_of_type(&self, name: &str, node_type: NodeType) -> bool {
        self.node(name).is_some_and(|n| n.node_type == node_type)
    }

    /// Iterate over all nodes in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over the policy classes in name order.
    pub fn policy_classes(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .values()
            .filter(|n| n.node_type == NodeType::PolicyClass)
            .map(|n| n.name.as_str())
    }

    /// Iterate over the direct parents of a node in name order.
    pub fn parents(&self, name: &str) -> impl Iterator<Item = &str> {
        self.parents
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Iterate over the direct children of a node in name order.
    pub fn children(&self, name: &str) -> impl Iterator<Item = &str> {
        self.children
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Whether `child` is directly assigned under `parent`.
    pub fn is_assigned(&self, child: &str, parent: &str) -> bool {
        self.parents
            .get(child)
            .is_some_and(|set| set.contains(parent))
    }

    /// Iterate over the associations leaving a user-side node.
    pub fn associations_from(&self, name: &str) -> impl Iterator<Item = (&str, &OperationSet)> {
        self.associations
            .get(name)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(t, ops)| (t.as_str(), ops)))
    }

    /// Iterate over the associations arriving at an object-side node.
    pub fn associations_to<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a OperationSet)> + 'a {
        self.associated_from
            .get(name)
            .into_iter()
            .flat_map(move |sources| {
                sources.iter().filter_map(move |source| {
                    self.associations
                        .get(source)
                        .and_then(|targets| targets.get(name))
                        .map(|ops| (source.as_str(), ops))
                })
            })
    }

    /// The operation set of the association between `from` and `to`, if any.
    pub fn association(&self, from: &str, to: &str) -> Option<&OperationSet> {
        self.associations.get(from).and_then(|targets| targets.get(to))
    }

    /// The node itself plus every node reachable from it by following
    /// assignments upward. Empty if the node does not exist.
    pub fn ascendants(&self, name: &str) -> BTreeSet<&str> {
        let mut visited = BTreeSet::new();
        let Some((start, _)) = self.nodes.get_key_value(name) else {
            return visited;
        };

        let mut stack = vec![start.as_str()];
        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(self.parents(current));
            }
        }
        visited
    }

    fn require_node(&self, name: &str) -> GraphResult<&Node> {
        self.nodes
            .get(name)
            .ok_or_else(|| GraphError::UnknownNode(name.to_string()))
    }
}

fn remove_edge(edges: &mut BTreeMap<String, BTreeSet<String>>, from: &str, to: &str) {
    if let Some(set) = edges.get_mut(from) {
        set.remove(to);
        if set.is_empty() {
            edges.remove(from);
        }
    }
}
