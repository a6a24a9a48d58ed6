//! Software identification records.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::{identifier_problem, DateTime};

/// A software identification (SwID) tag reported against a checked out
/// license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwID {
    /// The primary tag; unique across records.
    pub primary_tag: String,

    /// The raw SwID XML document.
    pub xml: String,

    /// The asset the license belongs to.
    pub asset: String,

    /// The license key the software runs under.
    pub license: String,

    /// When the lease of the license expires.
    pub lease_expiration: DateTime,
}

impl SwID {
    /// Create a SwID record for a license of an asset.
    pub fn new(
        primary_tag: impl Into<String>,
        asset: impl Into<String>,
        license: impl Into<String>,
    ) -> Self {
        Self {
            primary_tag: primary_tag.into(),
            asset: asset.into(),
            license: license.into(),
            ..Self::default()
        }
    }

    /// Check that the primary tag can be named in the policy graph.
    pub fn validate(&self) -> Result<(), DomainError> {
        match identifier_problem("primary tag", &self.primary_tag) {
            Some(reason) => Err(DomainError::InvalidSwID {
                primary_tag: self.primary_tag.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
