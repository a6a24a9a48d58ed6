//! Policy evaluation engine.
//!
//! This module computes the privileges an identity holds on a target node.

use std::collections::{BTreeMap, BTreeSet};

use blossom_core::error::{PolicyError, Result};
use blossom_core::log_event;
use blossom_core::utils::LogLevel;

use crate::engine::Privileges;
use crate::graph::Graph;
use crate::model::{Decision, NodeType, Operation, OperationSet};

/// Policy evaluation engine.
///
/// The evaluator is a pure function of the graph it borrows. It never
/// mutates the graph and never fails: an identity or target that is not in
/// the graph simply holds nothing.
#[derive(Debug, Clone, Copy)]
pub struct PolicyEvaluator<'g> {
    /// The attribute graph.
    graph: &'g Graph,
}

impl<'g> PolicyEvaluator<'g> {
    /// Create a new policy evaluator.
    ///
    /// # Arguments
    ///
    /// * `graph` - The attribute graph to evaluate against.
    ///
    /// # Returns
    ///
    /// A new policy evaluator.
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// The graph this evaluator reads.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// The node itself plus every node above it.
    pub fn ascendants(&self, name: &str) -> BTreeSet<&'g str> {
        self.graph.ascendants(name)
    }

    /// Compute the per policy class privileges of an identity on a target.
    ///
    /// # Arguments
    ///
    /// * `identity` - The name of a user node.
    /// * `target` - The name of an object-side node.
    ///
    /// # Returns
    ///
    /// The privileges, which are empty if the identity is not a user or the
    /// target does not exist.
    pub fn privileges(&self, identity: &str, target: &str) -> Privileges {
        let mut privileges = Privileges::none();

        if !self.graph.has_node_of_type(identity, NodeType::User) || !self.graph.contains(target) {
            return privileges;
        }

        let user_side = self.graph.ascendants(identity);
        let object_side = self.graph.ascendants(target);

        let governing: Vec<&str> = object_side
            .iter()
            .copied()
            .filter(|name| self.graph.has_node_of_type(name, NodeType::PolicyClass))
            .collect();

        for pc in &governing {
            privileges.govern(pc);
        }

        let mut cache: BTreeMap<&'g str, BTreeSet<&'g str>> = BTreeMap::new();

        for &object_attr in &object_side {
            for (user_attr, operations) in self.graph.associations_to(object_attr) {
                if !user_side.contains(user_attr) {
                    continue;
                }

                for &pc in &governing {
                    if self.is_under(&mut cache, user_attr, pc)
                        && self.is_under(&mut cache, object_attr, pc)
                    {
                        privileges.grant(pc, operations);
                    }
                }
            }
        }

        privileges
    }

    /// Compute the operations an identity holds on a target.
    pub fn granted_operations(&self, identity: &str, target: &str) -> OperationSet {
        self.privileges(identity, target).granted()
    }

    /// Decide whether an identity holds an operation on a target.
    pub fn decide(&self, identity: &str, target: &str, operation: Operation) -> Decision {
        let decision = Decision::from(self.privileges(identity, target).allows(operation));

        log_event!(LogLevel::Debug, "Decision",
            identity => identity,
            target => target,
            operation => operation,
            decision => decision,
        );

        decision
    }

    /// Decide and turn a denial into [`PolicyError::PermissionDenied`].
    pub fn check(&self, identity: &str, target: &str, operation: Operation) -> Result<()> {
        match self.decide(identity, target, operation) {
            Decision::Allowed => Ok(()),
            Decision::Denied => Err(PolicyError::PermissionDenied {
                identity: identity.to_string(),
                operation: operation.to_string(),
                target: target.to_string(),
            }
            .into()),
        }
    }

    fn is_under(
        &self,
        cache: &mut BTreeMap<&'g str, BTreeSet<&'g str>>,
        node: &'g str,
        policy_class: &str,
    ) -> bool {
        cache
            .entry(node)
            .or_insert_with(|| self.graph.ascendants(node))
            .contains(policy_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two policy classes govern the object "o". UA1 grants {A, B} through
    // PC1 and UA2 grants {B, C} through PC2.
    fn two_policy_classes() -> Graph {
        let mut graph = Graph::new();
        for pc in ["PC1", "PC2"] {
            graph.create_node(pc, NodeType::PolicyClass).unwrap();
        }
        graph.create_node("UA1", NodeType::UserAttribute).unwrap();
        graph.create_node("UA2", NodeType::UserAttribute).unwrap();
        graph.create_node("OA1", NodeType::ObjectAttribute).unwrap();
        graph.create_node("OA2", NodeType::ObjectAttribute).unwrap();
        graph.create_node("u", NodeType::User).unwrap();
        graph.create_node("o", NodeType::Object).unwrap();

        graph.assign("UA1", "PC1").unwrap();
        graph.assign("OA1", "PC1").unwrap();
        graph.assign("UA2", "PC2").unwrap();
        graph.assign("OA2", "PC2").unwrap();
        graph.assign("u", "UA1").unwrap();
        graph.assign("u", "UA2").unwrap();
        graph.assign("o", "OA1").unwrap();
        graph.assign("o", "OA2").unwrap();

        graph
            .associate(
                "UA1",
                "OA1",
                OperationSet::from([Operation::ViewAsset, Operation::Checkout]),
            )
            .unwrap();
        graph
            .associate(
                "UA2",
                "OA2",
                OperationSet::from([Operation::Checkout, Operation::Checkin]),
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_intersection_across_policy_classes() {
        let graph = two_policy_classes();
        let evaluator = PolicyEvaluator::new(&graph);

        assert_eq!(
            evaluator.granted_operations("u", "o"),
            OperationSet::from([Operation::Checkout])
        );
        assert_eq!(evaluator.decide("u", "o", Operation::Checkout), Decision::Allowed);
        assert_eq!(evaluator.decide("u", "o", Operation::ViewAsset), Decision::Denied);
    }

    #[test]
    fn test_privileges_breakdown() {
        let graph = two_policy_classes();
        let privileges = PolicyEvaluator::new(&graph).privileges("u", "o");

        let classes: Vec<_> = privileges.policy_classes().map(|(pc, _)| pc).collect();
        assert_eq!(classes, vec!["PC1", "PC2"]);
        assert_eq!(
            privileges.for_policy_class("PC1"),
            Some(&OperationSet::from([Operation::ViewAsset, Operation::Checkout]))
        );
    }

    #[test]
    fn test_association_outside_policy_class_does_not_count() {
        let mut graph = two_policy_classes();
        // UA1 sits only under PC1, so granting it on OA2 adds nothing to PC2.
        graph
            .associate("UA1", "OA2", OperationSet::from([Operation::ViewAsset]))
            .unwrap();
        let evaluator = PolicyEvaluator::new(&graph);

        assert_eq!(evaluator.decide("u", "o", Operation::ViewAsset), Decision::Denied);
    }

    #[test]
    fn test_ungoverned_target() {
        let mut graph = two_policy_classes();
        graph.create_node("floating", NodeType::ObjectAttribute).unwrap();
        graph
            .associate("UA1", "floating", OperationSet::from([Operation::ViewAsset]))
            .unwrap();
        let evaluator = PolicyEvaluator::new(&graph);

        assert!(evaluator.granted_operations("u", "floating").is_empty());
    }

    #[test]
    fn test_unknown_identity_and_target() {
        let graph = two_policy_classes();
        let evaluator = PolicyEvaluator::new(&graph);

        assert!(evaluator.granted_operations("nobody", "o").is_empty());
        assert!(evaluator.granted_operations("u", "nothing").is_empty());
        // A user attribute is not an identity
        assert!(evaluator.granted_operations("UA1", "o").is_empty());
    }

    #[test]
    fn test_check_denied() {
        let graph = two_policy_classes();
        let evaluator = PolicyEvaluator::new(&graph);

        assert!(evaluator.check("u", "o", Operation::Checkout).is_ok());
        let err = evaluator.check("u", "o", Operation::Checkin).unwrap_err();
        assert_eq!(err.to_string(), "Policy error: u is not permitted to checkin on o");
    }
}
