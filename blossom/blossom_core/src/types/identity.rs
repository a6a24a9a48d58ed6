//! Caller identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity of a caller, as supplied by the invocation layer.
///
/// The engine treats the value as opaque and matches it structurally
/// against `User` node names. Identities of account users take the form
/// `"{common_name}:{msp_id}"`. Verifying the identity is the job of the
/// invocation layer, not of the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identity string.
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Build the identity of a user within an MSP.
    pub fn from_parts(common_name: &str, msp_id: &str) -> Self {
        Self(format!("{}:{}", common_name, msp_id))
    }

    /// The identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The MSP part of the identity, if it has one.
    pub fn msp_id(&self) -> Option<&str> {
        self.0.rsplit_once(':').map(|(_, msp)| msp)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(identity: &str) -> Self {
        Self::new(identity)
    }
}

impl From<String> for Identity {
    fn from(identity: String) -> Self {
        Self(identity)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
