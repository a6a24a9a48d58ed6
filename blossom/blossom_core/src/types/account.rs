//! Accounts of member organizations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::types::{identifier_problem, Identity, Leases};

/// The approval status of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Requested and waiting for approval.
    #[default]
    Pending,

    /// Approved; the account's users may check out licenses.
    Approved,

    /// The request was turned down.
    Rejected,

    /// A previously approved account was revoked.
    Revoked,
}

impl AccountStatus {
    /// Get the name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "revoked" => Ok(Self::Revoked),
            _ => Err(format!("invalid account status: {}", s)),
        }
    }
}

/// The role an account user holds within the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Owns the account and requests it.
    SystemOwner,

    /// Checks out licenses and reports software identification.
    SystemAdministrator,

    /// Reviews licensing for the account.
    AcquisitionSpecialist,
}

impl Role {
    /// Every role, in a fixed order.
    pub const ALL: [Role; 3] = [
        Role::SystemOwner,
        Role::SystemAdministrator,
        Role::AcquisitionSpecialist,
    ];

    /// Get the name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemOwner => "SystemOwner",
            Self::SystemAdministrator => "SystemAdministrator",
            Self::AcquisitionSpecialist => "AcquisitionSpecialist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three users every account designates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Users {
    /// Common name of the system owner.
    pub system_owner: String,

    /// Common name of the system administrator.
    pub system_administrator: String,

    /// Common name of the acquisition specialist.
    pub acquisition_specialist: String,
}

impl Users {
    /// The common name of the user holding the role.
    pub fn get(&self, role: Role) -> &str {
        match role {
            Role::SystemOwner => &self.system_owner,
            Role::SystemAdministrator => &self.system_administrator,
            Role::AcquisitionSpecialist => &self.acquisition_specialist,
        }
    }
}

/// An account of a member organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The unique name of this account.
    pub name: String,

    /// Authorization to operate reference.
    pub ato: String,

    /// The MSP of the member organization.
    pub msp_id: String,

    /// The designated users.
    pub users: Users,

    /// The approval status.
    pub status: AccountStatus,

    /// Licenses held by this account, by asset ID.
    pub assets: BTreeMap<String, Leases>,
}

impl Account {
    /// Create a new pending account.
    pub fn new(name: impl Into<String>, msp_id: impl Into<String>, users: Users) -> Self {
        Self {
            name: name.into(),
            ato: String::new(),
            msp_id: msp_id.into(),
            users,
            status: AccountStatus::Pending,
            assets: BTreeMap::new(),
        }
    }

    /// The identity of the user holding the role.
    pub fn identity(&self, role: Role) -> Identity {
        Identity::from_parts(self.users.get(role), &self.msp_id)
    }

    /// The distinct identities of the account's users, in order.
    pub fn identities(&self) -> BTreeSet<Identity> {
        Role::ALL.into_iter().map(|role| self.identity(role)).collect()
    }

    /// Check that the account can be named in the policy graph.
    pub fn validate(&self) -> Result<(), DomainError> {
        let problem = identifier_problem("account name", &self.name)
            .or_else(|| identifier_problem("MSP ID", &self.msp_id))
            .or_else(|| {
                Role::ALL
                    .into_iter()
                    .find_map(|role| identifier_problem("user name", self.users.get(role)))
            });

        match problem {
            Some(reason) => Err(DomainError::InvalidAccount {
                account: self.name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
