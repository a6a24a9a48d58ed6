//! Licensed asset records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::DomainError;
use crate::types::identifier_problem;

/// A date supplied by the caller.
///
/// Dates are carried as opaque strings so that no wall-clock value ever
/// influences ledger state.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateTime(String);

impl DateTime {
    /// Wrap a date string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The date string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DateTime {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// License IDs mapped to their lease expiration.
pub type Leases = BTreeMap<String, DateTime>;

/// A software asset whose licenses are shared between accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// The unique ID of this asset.
    pub id: String,

    /// The display name of this asset.
    pub name: String,

    /// Total number of licenses.
    pub total_amount: usize,

    /// Number of licenses not checked out.
    pub available: usize,

    /// Cost per license.
    pub cost: f64,

    /// When the asset was onboarded.
    pub onboarding_date: DateTime,

    /// When the asset's licenses expire.
    pub expiration: DateTime,

    /// Every license key of this asset.
    pub licenses: Vec<String>,

    /// License keys not checked out.
    pub available_licenses: Vec<String>,

    /// Checked out licenses, by account name.
    pub checked_out: BTreeMap<String, Leases>,
}

impl Asset {
    /// Create a new asset with every license available.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        licenses: Vec<String>,
        cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_amount: licenses.len(),
            available: licenses.len(),
            cost,
            onboarding_date: DateTime::default(),
            expiration: DateTime::default(),
            available_licenses: licenses.clone(),
            licenses,
            checked_out: BTreeMap::new(),
        }
    }

    /// Set the onboarding and expiration dates.
    pub fn with_dates(mut self, onboarding_date: DateTime, expiration: DateTime) -> Self {
        self.onboarding_date = onboarding_date;
        self.expiration = expiration;
        self
    }

    /// Check that the license bookkeeping of a newly onboarded asset adds up.
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |reason: String| DomainError::InvalidAsset {
            asset: self.id.clone(),
            reason,
        };

        if let Some(problem) = identifier_problem("asset ID", &self.id) {
            return Err(invalid(problem));
        }
        if let Some(problem) = self
            .licenses
            .iter()
            .find_map(|license| identifier_problem("license key", license))
        {
            return Err(invalid(problem));
        }

        let unique: BTreeSet<&String> = self.licenses.iter().collect();
        if unique.len() != self.licenses.len() {
            return Err(invalid("duplicate license keys".to_string()));
        }

        if self.total_amount != self.licenses.len() {
            return Err(invalid(format!(
                "total amount {} does not match {} license keys",
                self.total_amount,
                self.licenses.len()
            )));
        }

        if self.available != self.available_licenses.len() {
            return Err(invalid(format!(
                "available count {} does not match {} available keys",
                self.available,
                self.available_licenses.len()
            )));
        }

        if let Some(stray) = self
            .available_licenses
            .iter()
            .find(|license| !unique.contains(license))
        {
            return Err(invalid(format!("available key {} is not a license", stray)));
        }

        Ok(())
    }

    /// Whether the license key belongs to this asset.
    pub fn has_license(&self, license: &str) -> bool {
        self.licenses.iter().any(|l| l == license)
    }

    /// Whether the license key is currently available.
    pub fn is_available(&self, license: &str) -> bool {
        self.available_licenses.iter().any(|l| l == license)
    }

    /// The leases an account currently holds on this asset.
    pub fn leases_of(&self, account: &str) -> Option<&Leases> {
        self.checked_out.get(account)
    }
}
