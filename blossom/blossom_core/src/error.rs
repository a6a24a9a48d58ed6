//! Error types for the Blossom policy engine.
//!
//! The errors are organized by subsystem: the attribute graph, policy
//! decisions, and the licensing domain. The root error type, `Error`, wraps
//! each of them so that callers can handle every failure uniformly while
//! still matching on the subsystem that produced it.
//!
//! Absence of privilege is never an error inside the engine. It only becomes
//! [`PolicyError::PermissionDenied`] when a decider refuses a mutation.

use thiserror::Error;

/// Root error type for the Blossom system.
#[derive(Debug, Error)]
pub enum Error {
    /// Attribute graph construction errors
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Policy decision errors
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Licensing domain errors
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The policy skeleton or stored graph is malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the attribute graph store.
///
/// These always indicate a defect in the topology logic of a policy
/// administration point; correctly configured policy never produces them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node with the given name does not exist
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// A node with the given name already exists
    #[error("Duplicate node: {0}")]
    DuplicateNode(String),

    /// The assignment would introduce a cycle
    #[error("Assigning {child} to {parent} would create a cycle")]
    CycleDetected {
        /// The node being assigned
        child: String,

        /// The node it would be assigned under
        parent: String,
    },

    /// The node types cannot be joined by an assignment
    #[error("Cannot assign {child} ({child_type}) to {parent} ({parent_type})")]
    InvalidAssignment {
        /// The node being assigned
        child: String,

        /// Type of the child node
        child_type: String,

        /// The node it would be assigned under
        parent: String,

        /// Type of the parent node
        parent_type: String,
    },

    /// An association must run from a user-side node to an object-side node
    #[error("Invalid association endpoints: {from} -> {to}")]
    InvalidAssociationEndpoints {
        /// The user-side node
        from: String,

        /// The object-side node
        to: String,
    },

    /// An association was given no operations
    #[error("Association {from} -> {to} has an empty operation set")]
    EmptyOperationSet {
        /// The user-side node
        from: String,

        /// The object-side node
        to: String,
    },
}

/// Errors related to policy decisions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The identity does not hold the operation on the target
    #[error("{identity} is not permitted to {operation} on {target}")]
    PermissionDenied {
        /// The caller identity
        identity: String,

        /// The operation that was requested
        operation: String,

        /// The decision target node
        target: String,
    },
}

/// Errors raised by licensing domain invariants.
///
/// The request was well-formed and authorized but conflicts with the
/// current state of the domain objects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Not enough licenses are available to satisfy a checkout
    #[error("Asset {asset} has {available} licenses available, {requested} requested")]
    InsufficientAvailability {
        /// The asset ID
        asset: String,

        /// Number of licenses requested
        requested: usize,

        /// Number of licenses currently available
        available: usize,
    },

    /// No asset with the given ID has been onboarded
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// No account with the given name has been requested
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// The license is not part of the asset
    #[error("Unknown license {license} for asset {asset}")]
    UnknownLicense {
        /// The asset ID
        asset: String,

        /// The license ID
        license: String,
    },

    /// The license is not in the state the request needs
    #[error("License {license} of asset {asset} is unavailable: {reason}")]
    LicenseUnavailable {
        /// The asset ID
        asset: String,

        /// The license ID
        license: String,

        /// Why the license cannot be used
        reason: String,
    },

    /// An asset with the given ID is already onboarded
    #[error("Asset already exists: {0}")]
    AssetExists(String),

    /// An account with the given name already exists
    #[error("Account already exists: {0}")]
    AccountExists(String),

    /// The asset record is internally inconsistent
    #[error("Invalid asset {asset}: {reason}")]
    InvalidAsset {
        /// The asset ID
        asset: String,

        /// What is wrong with it
        reason: String,
    },

    /// The account request cannot be admitted
    #[error("Invalid account {account}: {reason}")]
    InvalidAccount {
        /// The account name
        account: String,

        /// What is wrong with it
        reason: String,
    },

    /// The SwID record is malformed
    #[error("Invalid SwID {primary_tag}: {reason}")]
    InvalidSwID {
        /// The primary tag
        primary_tag: String,

        /// What is wrong with it
        reason: String,
    },

    /// A SwID with the given tag was reported by another account
    #[error("SwID already reported by another account: {0}")]
    SwIDExists(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type used throughout the Blossom system.
pub type Result<T> = std::result::Result<T, Error>;
