//! SwID decisions.

use blossom_core::error::{DomainError, Result};
use blossom_core::types::{Account, Asset, Identity, SwID};
use blossom_core::utils::LogLevel;
use blossom_core::{ensure_domain, log_event};

use crate::engine::{filter, PolicyEvaluator};
use crate::graph::Graph;
use crate::model::Operation;
use crate::pap::{self, SwIDPap};
use crate::pdp::{load_graph, Transaction};
use crate::store::{self, account_key, asset_key, swid_key, Ledger, SWID_PREFIX};

/// Guards the reporting of SwID records.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwIDDecider {
    pap: SwIDPap,
}

impl SwIDDecider {
    /// Create a new SwID decider.
    pub fn new() -> Self {
        Self { pap: SwIDPap::new() }
    }

    /// The PAP this decider applies its mutations through.
    pub fn pap(&self) -> &SwIDPap {
        &self.pap
    }

    /// Report a SwID against a license the account has checked out.
    ///
    /// Requires `ReportSwID` on the license object, which only exists while
    /// the license is checked out. The stored record takes its lease
    /// expiration from the checkout. A tag may be reported again only by the
    /// account that reported it first.
    pub fn report_swid<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        identity: &Identity,
        swid: &SwID,
        account_name: &str,
    ) -> Result<()> {
        let mut tx = Transaction::begin(ledger, identity)?;
        let asset: Asset = tx
            .get(&asset_key(&swid.asset))?
            .ok_or_else(|| DomainError::UnknownAsset(swid.asset.clone()))?;
        ensure_domain!(
            tx.get::<Account>(&account_key(account_name))?.is_some(),
            DomainError::UnknownAccount(account_name.to_string())
        );

        tx.require(
            &pap::asset::license_object(&swid.asset, &swid.license),
            Operation::ReportSwID,
        )?;

        swid.validate()?;

        let Some(lease) = asset
            .leases_of(account_name)
            .and_then(|leases| leases.get(&swid.license))
        else {
            return Err(DomainError::LicenseUnavailable {
                asset: swid.asset.clone(),
                license: swid.license.clone(),
                reason: format!("not checked out by {}", account_name),
            }
            .into());
        };

        let oa = pap::swid::object_attribute(&swid.primary_tag);
        let reported_elsewhere = tx.get::<SwID>(&swid_key(&swid.primary_tag))?.is_some()
            && !tx
                .graph()
                .is_assigned(&oa, &pap::account::object_attribute(account_name));
        ensure_domain!(
            !reported_elsewhere,
            DomainError::SwIDExists(swid.primary_tag.clone())
        );

        let mut record = swid.clone();
        record.lease_expiration = lease.clone();

        self.pap.report(tx.graph_mut(), &record, account_name)?;
        tx.stage(swid_key(&record.primary_tag), &record)?;
        tx.commit()?;

        log_event!(LogLevel::Info, "SwID reported",
            swid => record.primary_tag,
            asset => record.asset,
            license => record.license,
        );
        Ok(())
    }

    /// Filter SwIDs down to what `identity` may see.
    pub fn filter_swids(&self, graph: &Graph, identity: &Identity, swids: Vec<SwID>) -> Vec<SwID> {
        filter(&PolicyEvaluator::new(graph), identity.as_str(), swids)
    }

    /// Every SwID `identity` may see, in tag order.
    pub fn swids<L: Ledger + ?Sized>(&self, ledger: &L, identity: &Identity) -> Result<Vec<SwID>> {
        let graph = load_graph(ledger)?;
        let swids = store::records_with_prefix(ledger, SWID_PREFIX)?;
        Ok(self.filter_swids(&graph, identity, swids))
    }
}
