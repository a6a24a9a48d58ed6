//! Operations granted by associations.
//!
//! The set of operations is closed: adding one is a policy migration, not
//! something callers can do at runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The resource domain an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    /// Licensed assets.
    Asset,

    /// Member accounts.
    Account,

    /// Software identification records.
    SwID,
}

/// An operation that can be granted on an object-side node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Add an asset to the catalog.
    OnboardAsset,

    /// Remove an asset from the catalog.
    OffboardAsset,

    /// See an asset's identifying fields.
    ViewAsset,

    /// See every license key of an asset.
    ViewAllLicenses,

    /// See the available license keys of an asset.
    ViewAvailableLicenses,

    /// See which accounts hold which licenses.
    ViewCheckedOut,

    /// Check out licenses.
    Checkout,

    /// Return checked out licenses.
    Checkin,

    /// Request a new account.
    RequestAccount,

    /// Change the status of an account.
    ApproveAccount,

    /// See an account.
    ViewAccount,

    /// Report a SwID record against a license.
    #[serde(rename = "report_swid")]
    ReportSwID,

    /// See a SwID record.
    #[serde(rename = "view_swid")]
    ViewSwID,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 13] = [
        Operation::OnboardAsset,
        Operation::OffboardAsset,
        Operation::ViewAsset,
        Operation::ViewAllLicenses,
        Operation::ViewAvailableLicenses,
        Operation::ViewCheckedOut,
        Operation::Checkout,
        Operation::Checkin,
        Operation::RequestAccount,
        Operation::ApproveAccount,
        Operation::ViewAccount,
        Operation::ReportSwID,
        Operation::ViewSwID,
    ];

    /// Get the name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnboardAsset => "onboard_asset",
            Self::OffboardAsset => "offboard_asset",
            Self::ViewAsset => "view_asset",
            Self::ViewAllLicenses => "view_all_licenses",
            Self::ViewAvailableLicenses => "view_available_licenses",
            Self::ViewCheckedOut => "view_checked_out",
            Self::Checkout => "checkout",
            Self::Checkin => "checkin",
            Self::RequestAccount => "request_account",
            Self::ApproveAccount => "approve_account",
            Self::ViewAccount => "view_account",
            Self::ReportSwID => "report_swid",
            Self::ViewSwID => "view_swid",
        }
    }

    /// The resource domain of this operation.
    pub fn domain(&self) -> Domain {
        match self {
            Self::OnboardAsset
            | Self::OffboardAsset
            | Self::ViewAsset
            | Self::ViewAllLicenses
            | Self::ViewAvailableLicenses
            | Self::ViewCheckedOut
            | Self::Checkout
            | Self::Checkin => Domain::Asset,
            Self::RequestAccount | Self::ApproveAccount | Self::ViewAccount => Domain::Account,
            Self::ReportSwID | Self::ViewSwID => Domain::SwID,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operation: {}", s))
    }
}

/// An ordered set of operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationSet(BTreeSet<Operation>);

impl OperationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether the set contains the operation.
    pub fn contains(&self, op: Operation) -> bool {
        self.0.contains(&op)
    }

    /// Add an operation.
    pub fn insert(&mut self, op: Operation) -> bool {
        self.0.insert(op)
    }

    /// Add every operation of another set.
    pub fn union_with(&mut self, other: &OperationSet) {
        self.0.extend(other.0.iter().copied());
    }

    /// The operations present in both sets.
    pub fn intersection(&self, other: &OperationSet) -> OperationSet {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of operations in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the operations in order.
    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Operation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&[Operation]> for OperationSet {
    fn from(ops: &[Operation]) -> Self {
        ops.iter().copied().collect()
    }
}

impl<const N: usize> From<[Operation; N]> for OperationSet {
    fn from(ops: [Operation; N]) -> Self {
        ops.into_iter().collect()
    }
}

impl fmt::Display for OperationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, op) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", op)?;
        }
        write!(f, "}}")
    }
}
