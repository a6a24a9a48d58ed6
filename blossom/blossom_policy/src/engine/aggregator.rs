//! Privilege aggregation across policy classes.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Operation, OperationSet};

/// The operations an identity holds on a target, broken down by the policy
/// classes that govern the target.
///
/// Within one policy class, grants from every applicable association are
/// unioned. Across policy classes they are intersected: every class that
/// governs the target must grant an operation for it to be held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Privileges {
    by_policy_class: BTreeMap<String, OperationSet>,
}

impl Privileges {
    /// Privileges of an identity that holds nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Register a governing policy class with no grants yet.
    pub(crate) fn govern(&mut self, policy_class: &str) {
        self.by_policy_class
            .entry(policy_class.to_string())
            .or_default();
    }

    /// Union operations into the grants of a policy class.
    pub(crate) fn grant(&mut self, policy_class: &str, operations: &OperationSet) {
        self.by_policy_class
            .entry(policy_class.to_string())
            .or_default()
            .union_with(operations);
    }

    /// Whether any policy class governs the target.
    pub fn is_governed(&self) -> bool {
        !self.by_policy_class.is_empty()
    }

    /// Iterate over the governing policy classes and their grants.
    pub fn policy_classes(&self) -> impl Iterator<Item = (&str, &OperationSet)> {
        self.by_policy_class
            .iter()
            .map(|(pc, ops)| (pc.as_str(), ops))
    }

    /// The grants of a single policy class.
    pub fn for_policy_class(&self, policy_class: &str) -> Option<&OperationSet> {
        self.by_policy_class.get(policy_class)
    }

    /// The operations held: the intersection of every governing policy
    /// class's grants. Empty when nothing governs the target.
    pub fn granted(&self) -> OperationSet {
        let mut sets = self.by_policy_class.values();
        let Some(first) = sets.next() else {
            return OperationSet::new();
        };
        sets.fold(first.clone(), |acc, ops| acc.intersection(ops))
    }

    /// Whether the operation is held.
    pub fn allows(&self, operation: Operation) -> bool {
        self.is_governed()
            && self
                .by_policy_class
                .values()
                .all(|ops| ops.contains(operation))
    }
}
