//! Account decisions.

use blossom_core::error::{DomainError, Result};
use blossom_core::types::{Account, AccountStatus, Identity, Role};
use blossom_core::utils::LogLevel;
use blossom_core::{ensure_domain, log_event};

use crate::engine::{filter, PolicyEvaluator};
use crate::graph::Graph;
use crate::model::Operation;
use crate::pap::{self, policy, AccountPap};
use crate::pdp::{load_graph, Transaction};
use crate::store::{self, account_key, Ledger, ACCOUNT_PREFIX};

/// Guards requests for accounts and changes to their status.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccountDecider {
    pap: AccountPap,
}

impl AccountDecider {
    /// Create a new account decider.
    pub fn new() -> Self {
        Self {
            pap: AccountPap::new(),
        }
    }

    /// The PAP this decider applies its mutations through.
    pub fn pap(&self) -> &AccountPap {
        &self.pap
    }

    /// Request a new account.
    ///
    /// The account's own system owner may request it, since they have no
    /// node in the graph until the request succeeds. Anyone else needs
    /// `RequestAccount` on the account collection. The account is always
    /// stored as pending and without holdings.
    ///
    /// Every user the account names must be new to the graph. A user of one
    /// account can never become a user of another.
    pub fn request_account<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        identity: &Identity,
        account: &Account,
    ) -> Result<()> {
        let mut tx = Transaction::begin(ledger, identity)?;

        let self_registration = *identity == account.identity(Role::SystemOwner);
        if !self_registration {
            tx.require(policy::ACCOUNTS_OA, Operation::RequestAccount)?;
        }

        let key = account_key(&account.name);
        ensure_domain!(
            tx.get::<Account>(&key)?.is_none(),
            DomainError::AccountExists(account.name.clone())
        );

        account.validate()?;
        if let Some(taken) = account
            .identities()
            .into_iter()
            .find(|user| tx.graph().contains(user.as_str()))
        {
            return Err(DomainError::InvalidAccount {
                account: account.name.clone(),
                reason: format!("{} is already a user", taken),
            }
            .into());
        }

        let mut record = account.clone();
        record.status = AccountStatus::Pending;
        record.assets.clear();

        self.pap.request(tx.graph_mut(), &record)?;
        tx.stage(key, &record)?;
        tx.commit()?;

        log_event!(LogLevel::Info, "Account requested",
            account => record.name,
            requested_by => identity,
        );
        Ok(())
    }

    /// Change the status of an account.
    ///
    /// Requires `ApproveAccount` on the account.
    pub fn update_account_status<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        identity: &Identity,
        name: &str,
        status: AccountStatus,
    ) -> Result<()> {
        let mut tx = Transaction::begin(ledger, identity)?;
        let key = account_key(name);
        let mut account: Account = tx
            .get(&key)?
            .ok_or_else(|| DomainError::UnknownAccount(name.to_string()))?;

        tx.require(&pap::account::object_attribute(name), Operation::ApproveAccount)?;

        self.pap.update_status(tx.graph_mut(), name, status)?;
        account.status = status;
        tx.stage(key, &account)?;
        tx.commit()?;

        log_event!(LogLevel::Info, "Account status updated",
            account => name,
            status => status,
        );
        Ok(())
    }

    /// Filter accounts down to what `identity` may see.
    pub fn filter_accounts(
        &self,
        graph: &Graph,
        identity: &Identity,
        accounts: Vec<Account>,
    ) -> Vec<Account> {
        filter(&PolicyEvaluator::new(graph), identity.as_str(), accounts)
    }

    /// Every account `identity` may see, in name order.
    pub fn accounts<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        identity: &Identity,
    ) -> Result<Vec<Account>> {
        let graph = load_graph(ledger)?;
        let accounts = store::records_with_prefix(ledger, ACCOUNT_PREFIX)?;
        Ok(self.filter_accounts(&graph, identity, accounts))
    }

    /// A single account, if it exists and `identity` may see it.
    pub fn account<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        identity: &Identity,
        name: &str,
    ) -> Result<Option<Account>> {
        let graph = load_graph(ledger)?;
        let accounts: Vec<Account> = store::get_record(ledger, &account_key(name))?
            .into_iter()
            .collect();
        Ok(self.filter_accounts(&graph, identity, accounts).pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_core::error::Error;
    use blossom_core::types::Users;
    use blossom_core::utils::PolicyConfig;

    use crate::pdp;
    use crate::store::InMemoryLedger;

    fn account(name: &str, owner: &str) -> Account {
        Account::new(
            name,
            "OrgMSP",
            Users {
                system_owner: owner.to_string(),
                system_administrator: format!("{}_admin", owner),
                acquisition_specialist: format!("{}_acq", owner),
            },
        )
    }

    fn ledger() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        pdp::initialize(&mut ledger, &PolicyConfig::default()).unwrap();
        ledger
    }

    #[test]
    fn test_self_registration_is_stored_pending() {
        let mut ledger = ledger();
        let mut request = account("B", "bob");
        request.status = AccountStatus::Approved;

        let owner = request.identity(Role::SystemOwner);
        AccountDecider::new()
            .request_account(&mut ledger, &owner, &request)
            .unwrap();

        let stored: Account = store::get_record(&ledger, &account_key("B"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, AccountStatus::Pending);
    }

    #[test]
    fn test_existing_user_cannot_register_again() {
        let mut ledger = ledger();
        let decider = AccountDecider::new();
        let first = account("B", "bob");
        let owner = first.identity(Role::SystemOwner);
        decider.request_account(&mut ledger, &owner, &first).unwrap();

        let result = decider.request_account(&mut ledger, &owner, &account("C", "bob"));
        assert!(matches!(
            result,
            Err(Error::Domain(DomainError::InvalidAccount { .. }))
        ));
    }

    #[test]
    fn test_update_unknown_account() {
        let mut ledger = ledger();
        let identity = PolicyConfig::default().super_identity();
        let result = AccountDecider::new().update_account_status(
            &mut ledger,
            &identity,
            "ghost",
            AccountStatus::Approved,
        );
        assert!(matches!(
            result,
            Err(Error::Domain(DomainError::UnknownAccount(_)))
        ));
    }
}
