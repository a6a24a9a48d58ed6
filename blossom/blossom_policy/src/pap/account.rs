//! Account policy administration.
//!
//! An account is an object attribute under both policy classes. Its users
//! are gathered into a members attribute whose placement under
//! `Status.active` or `Status.pending` encodes the account status, and into
//! one attribute per role that carries the role's grants on the account.
//!
//! The members attribute holds the account's only status grant, an
//! association to the account's own object attribute. Belonging to an
//! approved account therefore grants nothing on any other account.

use blossom_core::error::Result;
use blossom_core::log_event;
use blossom_core::types::{Account, AccountStatus, Role};
use blossom_core::utils::LogLevel;

use crate::graph::Graph;
use crate::model::{NodeType, OperationSet, Properties};
use crate::pap::policy;

/// The object attribute that represents an account.
pub fn object_attribute(name: &str) -> String {
    format!("accounts/{}", name)
}

/// The user attribute holding every user of an account.
pub fn members_attribute(name: &str) -> String {
    format!("accounts/{}/members", name)
}

/// The user attribute holding the user with the given role in an account.
pub fn role_attribute(name: &str, role: Role) -> String {
    format!("accounts/{}/{}", name, role)
}

/// Maintains the graph topology of accounts and their users.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccountPap;

impl AccountPap {
    /// Create a new account PAP.
    pub fn new() -> Self {
        Self
    }

    /// Add a newly requested account with pending status.
    pub fn request(&self, graph: &mut Graph, account: &Account) -> Result<()> {
        let oa = object_attribute(&account.name);
        let members = members_attribute(&account.name);

        let mut properties = Properties::new();
        properties.insert("account".to_string(), account.name.clone());

        graph.create_node_with_properties(&oa, NodeType::ObjectAttribute, properties.clone())?;
        graph.assign(&oa, policy::ACCOUNTS_OA)?;
        graph.assign(&oa, policy::STATUS_ACCOUNTS_OA)?;

        graph.create_node_with_properties(&members, NodeType::UserAttribute, properties.clone())?;
        graph.assign(&members, policy::PENDING_UA)?;
        graph.associate(
            &members,
            &oa,
            OperationSet::from(policy::status_operations(AccountStatus::Pending)),
        )?;

        for role in Role::ALL {
            let ua = role_attribute(&account.name, role);
            graph.create_node_with_properties(&ua, NodeType::UserAttribute, properties.clone())?;
            graph.assign(&ua, &policy::role_attribute(role))?;
            graph.associate(&ua, &oa, OperationSet::from(policy::account_operations(role)))?;

            // One person may hold several roles
            let user = account.identity(role);
            if !graph.contains(user.as_str()) {
                graph.create_node(user.as_str(), NodeType::User)?;
            }
            graph.assign(user.as_str(), &ua)?;
            graph.assign(user.as_str(), &members)?;
        }

        log_event!(LogLevel::Debug, "Account nodes added", account => account.name);
        Ok(())
    }

    /// Move an account's members to the status attribute for `status` and
    /// swap their status grant on the account.
    ///
    /// Rejected and revoked accounts are placed under no status attribute
    /// and keep no status grant, which leaves them with nothing under the
    /// status policy class.
    pub fn update_status(&self, graph: &mut Graph, name: &str, status: AccountStatus) -> Result<()> {
        let oa = object_attribute(name);
        let members = members_attribute(name);

        graph.deassign(&members, policy::ACTIVE_UA)?;
        graph.deassign(&members, policy::PENDING_UA)?;
        graph.dissociate(&members, &oa)?;

        match status {
            AccountStatus::Approved => graph.assign(&members, policy::ACTIVE_UA)?,
            AccountStatus::Pending => graph.assign(&members, policy::PENDING_UA)?,
            AccountStatus::Rejected | AccountStatus::Revoked => {}
        }

        let operations = policy::status_operations(status);
        if !operations.is_empty() {
            graph.associate(&members, &oa, OperationSet::from(operations))?;
        }

        log_event!(LogLevel::Debug, "Account status moved",
            account => name,
            status => status,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PolicyEvaluator;
    use crate::model::Operation;
    use blossom_core::types::Users;
    use blossom_core::utils::PolicyConfig;

    fn account() -> Account {
        Account::new(
            "A1",
            "A1MSP",
            Users {
                system_owner: "a1_owner".into(),
                system_administrator: "a1_admin".into(),
                acquisition_specialist: "a1_acq".into(),
            },
        )
    }

    #[test]
    fn test_request_creates_topology() {
        let mut graph = policy::bootstrap(&PolicyConfig::default()).unwrap();
        AccountPap::new().request(&mut graph, &account()).unwrap();

        assert!(graph.is_assigned("accounts/A1", policy::ACCOUNTS_OA));
        assert!(graph.is_assigned("accounts/A1", policy::STATUS_ACCOUNTS_OA));
        assert!(graph.is_assigned("accounts/A1/members", policy::PENDING_UA));
        assert!(graph.is_assigned("accounts/A1/SystemAdministrator", "RBAC.SystemAdministrator"));
        assert!(graph.is_assigned("a1_admin:A1MSP", "accounts/A1/SystemAdministrator"));
        assert!(graph.is_assigned("a1_admin:A1MSP", "accounts/A1/members"));
        assert!(graph
            .association("accounts/A1/SystemAdministrator", "accounts/A1")
            .is_some());
        assert_eq!(
            graph.association("accounts/A1/members", "accounts/A1"),
            Some(&OperationSet::from([Operation::ViewAccount]))
        );
    }

    #[test]
    fn test_shared_user_across_roles() {
        let mut graph = policy::bootstrap(&PolicyConfig::default()).unwrap();
        let mut account = account();
        account.users.acquisition_specialist = "a1_owner".into();

        AccountPap::new().request(&mut graph, &account).unwrap();
        let parents: Vec<_> = graph.parents("a1_owner:A1MSP").collect();
        assert_eq!(
            parents,
            vec![
                "accounts/A1/AcquisitionSpecialist",
                "accounts/A1/SystemOwner",
                "accounts/A1/members"
            ]
        );
    }

    #[test]
    fn test_status_transitions() {
        let mut graph = policy::bootstrap(&PolicyConfig::default()).unwrap();
        let pap = AccountPap::new();
        pap.request(&mut graph, &account()).unwrap();

        pap.update_status(&mut graph, "A1", AccountStatus::Approved).unwrap();
        assert_eq!(
            graph.parents("accounts/A1/members").collect::<Vec<_>>(),
            vec![policy::ACTIVE_UA]
        );
        assert!(graph
            .association("accounts/A1/members", "accounts/A1")
            .is_some_and(|ops| ops.contains(Operation::Checkout)));

        pap.update_status(&mut graph, "A1", AccountStatus::Revoked).unwrap();
        assert_eq!(graph.parents("accounts/A1/members").count(), 0);
        assert!(graph.association("accounts/A1/members", "accounts/A1").is_none());

        pap.update_status(&mut graph, "A1", AccountStatus::Pending).unwrap();
        assert_eq!(
            graph.parents("accounts/A1/members").collect::<Vec<_>>(),
            vec![policy::PENDING_UA]
        );
    }

    #[test]
    fn test_approval_stays_with_its_account() {
        let mut graph = policy::bootstrap(&PolicyConfig::default()).unwrap();
        let pap = AccountPap::new();
        pap.request(&mut graph, &account()).unwrap();
        pap.update_status(&mut graph, "A1", AccountStatus::Approved).unwrap();

        // The same person administers a second account that is still pending
        let mut other = account();
        other.name = "A2".to_string();
        pap.request(&mut graph, &other).unwrap();

        let evaluator = PolicyEvaluator::new(&graph);
        assert!(evaluator
            .decide("a1_admin:A1MSP", "accounts/A1", Operation::Checkout)
            .is_allowed());
        assert!(!evaluator
            .decide("a1_admin:A1MSP", "accounts/A2", Operation::Checkout)
            .is_allowed());
        assert!(evaluator
            .decide("a1_admin:A1MSP", "accounts/A2", Operation::ViewAccount)
            .is_allowed());
    }

    #[test]
    fn test_duplicate_request_fails() {
        let mut graph = policy::bootstrap(&PolicyConfig::default()).unwrap();
        let pap = AccountPap::new();
        pap.request(&mut graph, &account()).unwrap();
        assert!(pap.request(&mut graph, &account()).is_err());
    }
}
