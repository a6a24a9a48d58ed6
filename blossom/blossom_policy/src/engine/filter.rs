//! Per-caller filtering of domain records.
//!
//! A record is dropped when the caller lacks its baseline view operation on
//! the record's graph node. Records that survive have each privileged field
//! cleared unless the caller holds the operation that exposes it.

use blossom_core::types::{Account, Asset, SwID};

use crate::engine::PolicyEvaluator;
use crate::model::{Operation, OperationSet};
use crate::pap;

/// A domain record that can be filtered against the caller's privileges.
pub trait Redactable {
    /// The operation required to see the record at all.
    const BASELINE: Operation;

    /// The graph node that represents this record.
    fn node_name(&self) -> String;

    /// Clear the fields the caller may not see.
    fn redact(&mut self, granted: &OperationSet);
}

/// Filter records down to what `identity` may see.
///
/// The output preserves the input order.
pub fn filter<T: Redactable>(
    evaluator: &PolicyEvaluator<'_>,
    identity: &str,
    items: Vec<T>,
) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|mut item| {
            let granted = evaluator.granted_operations(identity, &item.node_name());
            if !granted.contains(T::BASELINE) {
                return None;
            }
            item.redact(&granted);
            Some(item)
        })
        .collect()
}

impl Redactable for Asset {
    const BASELINE: Operation = Operation::ViewAsset;

    fn node_name(&self) -> String {
        pap::asset::object_attribute(&self.id)
    }

    fn redact(&mut self, granted: &OperationSet) {
        if !granted.contains(Operation::ViewAllLicenses) {
            self.licenses.clear();
        }
        if !granted.contains(Operation::ViewAvailableLicenses) {
            self.available_licenses.clear();
        }
        if !granted.contains(Operation::ViewCheckedOut) {
            self.checked_out.clear();
        }
    }
}

impl Redactable for Account {
    const BASELINE: Operation = Operation::ViewAccount;

    fn node_name(&self) -> String {
        pap::account::object_attribute(&self.name)
    }

    fn redact(&mut self, _granted: &OperationSet) {}
}

impl Redactable for SwID {
    const BASELINE: Operation = Operation::ViewSwID;

    fn node_name(&self) -> String {
        pap::swid::object_attribute(&self.primary_tag)
    }

    fn redact(&mut self, _granted: &OperationSet) {}
}
