//! # Blossom Core
//!
//! `blossom_core` provides the building blocks shared by the Blossom policy
//! engine and its tools: the error hierarchy, the licensing domain types,
//! and logging and configuration utilities.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all Blossom components
//! - **types**: Assets, accounts, SwID records and caller identities
//! - **utils**: Logging levels and TOML configuration
//! - **macros**: Logging and domain-check macros

pub mod error;
pub mod macros;
pub mod types;
pub mod utils;

#[doc(hidden)]
pub use log;

// Re-export key types for convenience
pub use error::{DomainError, Error, GraphError, PolicyError, Result};
// Macros are automatically exported at the crate root due to #[macro_export]
pub use types::{Account, AccountStatus, Asset, DateTime, Identity, Leases, Role, SwID, Users};
pub use utils::{BlossomConfig, LogLevel, LoggingConfig, PolicyConfig};
