//! Asset decisions.

use std::collections::BTreeSet;

use blossom_core::error::{DomainError, Result};
use blossom_core::types::{Account, Asset, Identity, Leases};
use blossom_core::utils::LogLevel;
use blossom_core::{ensure_domain, log_event};

use crate::engine::{filter, PolicyEvaluator};
use crate::graph::Graph;
use crate::model::Operation;
use crate::pap::{self, policy, AssetPap};
use crate::pdp::{load_graph, Transaction};
use crate::store::{self, account_key, asset_key, Ledger, ASSET_PREFIX};

/// Guards onboarding, offboarding, checkout and checkin of assets.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssetDecider {
    pap: AssetPap,
}

impl AssetDecider {
    /// Create a new asset decider.
    pub fn new() -> Self {
        Self { pap: AssetPap::new() }
    }

    /// The PAP this decider applies its mutations through.
    pub fn pap(&self) -> &AssetPap {
        &self.pap
    }

    /// Add an asset to the catalog.
    ///
    /// Requires `OnboardAsset` on the catalog. The asset must be new, hold
    /// no checked out licenses and have consistent license bookkeeping.
    pub fn onboard_asset<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        identity: &Identity,
        asset: &Asset,
    ) -> Result<()> {
        let mut tx = Transaction::begin(ledger, identity)?;
        tx.require(policy::ASSETS_OA, Operation::OnboardAsset)?;

        let key = asset_key(&asset.id);
        ensure_domain!(
            tx.get::<Asset>(&key)?.is_none(),
            DomainError::AssetExists(asset.id.clone())
        );
        asset.validate()?;
        ensure_domain!(
            asset.checked_out.is_empty(),
            DomainError::InvalidAsset {
                asset: asset.id.clone(),
                reason: "a new asset cannot have checked out licenses".to_string(),
            }
        );

        self.pap.onboard(tx.graph_mut(), asset)?;
        tx.stage(key, asset)?;
        tx.commit()?;

        log_event!(LogLevel::Info, "Asset onboarded",
            asset => asset.id,
            licenses => asset.total_amount,
        );
        Ok(())
    }

    /// Remove an asset from the catalog.
    ///
    /// Requires `OffboardAsset` on the asset. Leases still held on the asset
    /// are dropped from the holding accounts.
    pub fn offboard_asset<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        identity: &Identity,
        asset_id: &str,
    ) -> Result<()> {
        let mut tx = Transaction::begin(ledger, identity)?;
        let key = asset_key(asset_id);
        let asset: Asset = tx
            .get(&key)?
            .ok_or_else(|| DomainError::UnknownAsset(asset_id.to_string()))?;

        tx.require(&pap::asset::object_attribute(asset_id), Operation::OffboardAsset)?;

        for holder in asset.checked_out.keys() {
            let holder_key = account_key(holder);
            if let Some(mut account) = tx.get::<Account>(&holder_key)? {
                account.assets.remove(asset_id);
                tx.stage(holder_key, &account)?;
            }
        }

        self.pap.offboard(tx.graph_mut(), asset_id)?;
        tx.stage_delete(key);
        tx.commit()?;

        log_event!(LogLevel::Info, "Asset offboarded", asset => asset_id);
        Ok(())
    }

    /// Check out licenses of an asset to an account.
    ///
    /// Requires `Checkout` on both the account and the asset. The licenses
    /// must belong to the asset and be available, and the asset must have at
    /// least as many licenses available as requested.
    pub fn checkout<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        identity: &Identity,
        account_name: &str,
        asset_id: &str,
        licenses: &Leases,
    ) -> Result<()> {
        let mut tx = Transaction::begin(ledger, identity)?;
        let (mut account, mut asset) = load_pair(&tx, account_name, asset_id)?;

        tx.require(&pap::account::object_attribute(account_name), Operation::Checkout)?;
        tx.require(&pap::asset::object_attribute(asset_id), Operation::Checkout)?;

        if licenses.is_empty() {
            return Ok(());
        }

        ensure_domain!(
            licenses.len() <= asset.available,
            DomainError::InsufficientAvailability {
                asset: asset_id.to_string(),
                requested: licenses.len(),
                available: asset.available,
            }
        );
        for license in licenses.keys() {
            ensure_domain!(
                asset.has_license(license),
                DomainError::UnknownLicense {
                    asset: asset_id.to_string(),
                    license: license.clone(),
                }
            );
            ensure_domain!(
                asset.is_available(license),
                DomainError::LicenseUnavailable {
                    asset: asset_id.to_string(),
                    license: license.clone(),
                    reason: "already checked out".to_string(),
                }
            );
        }

        self.pap.checkout(
            tx.graph_mut(),
            account_name,
            asset_id,
            licenses.keys().map(String::as_str),
        )?;

        asset.available -= licenses.len();
        asset
            .available_licenses
            .retain(|license| !licenses.contains_key(license));
        asset
            .checked_out
            .entry(account_name.to_string())
            .or_default()
            .extend(licenses.clone());
        account
            .assets
            .entry(asset_id.to_string())
            .or_default()
            .extend(licenses.clone());

        tx.stage(asset_key(asset_id), &asset)?;
        tx.stage(account_key(account_name), &account)?;
        tx.commit()?;

        log_event!(LogLevel::Info, "Licenses checked out",
            account => account_name,
            asset => asset_id,
            count => licenses.len(),
        );
        Ok(())
    }

    /// Return licenses an account has checked out.
    ///
    /// Requires `Checkin` on both the account and the asset. Every license
    /// must currently be checked out by the account.
    pub fn checkin<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        identity: &Identity,
        account_name: &str,
        asset_id: &str,
        licenses: &[String],
    ) -> Result<()> {
        let mut tx = Transaction::begin(ledger, identity)?;
        let (mut account, mut asset) = load_pair(&tx, account_name, asset_id)?;

        tx.require(&pap::account::object_attribute(account_name), Operation::Checkin)?;
        tx.require(&pap::asset::object_attribute(asset_id), Operation::Checkin)?;

        let returned: BTreeSet<&str> = licenses.iter().map(String::as_str).collect();
        if returned.is_empty() {
            return Ok(());
        }

        for &license in &returned {
            ensure_domain!(
                asset.has_license(license),
                DomainError::UnknownLicense {
                    asset: asset_id.to_string(),
                    license: license.to_string(),
                }
            );
            ensure_domain!(
                asset
                    .leases_of(account_name)
                    .is_some_and(|leases| leases.contains_key(license)),
                DomainError::LicenseUnavailable {
                    asset: asset_id.to_string(),
                    license: license.to_string(),
                    reason: format!("not checked out by {}", account_name),
                }
            );
        }

        self.pap
            .checkin(tx.graph_mut(), asset_id, returned.iter().copied())?;

        asset.available += returned.len();
        let available: BTreeSet<String> = asset
            .available_licenses
            .iter()
            .cloned()
            .chain(returned.iter().map(|l| l.to_string()))
            .collect();
        // Keep the catalog order of the license keys
        asset.available_licenses = asset
            .licenses
            .iter()
            .filter(|license| available.contains(*license))
            .cloned()
            .collect();
        release(&mut asset.checked_out, account_name, &returned);
        release(&mut account.assets, asset_id, &returned);

        tx.stage(asset_key(asset_id), &asset)?;
        tx.stage(account_key(account_name), &account)?;
        tx.commit()?;

        log_event!(LogLevel::Info, "Licenses checked in",
            account => account_name,
            asset => asset_id,
            count => returned.len(),
        );
        Ok(())
    }

    /// Filter assets down to what `identity` may see.
    pub fn filter_assets(&self, graph: &Graph, identity: &Identity, assets: Vec<Asset>) -> Vec<Asset> {
        filter(&PolicyEvaluator::new(graph), identity.as_str(), assets)
    }

    /// Every asset `identity` may see, in ID order.
    pub fn assets<L: Ledger + ?Sized>(&self, ledger: &L, identity: &Identity) -> Result<Vec<Asset>> {
        let graph = load_graph(ledger)?;
        let assets = store::records_with_prefix(ledger, ASSET_PREFIX)?;
        Ok(self.filter_assets(&graph, identity, assets))
    }

    /// A single asset, if it exists and `identity` may see it.
    pub fn asset<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        identity: &Identity,
        asset_id: &str,
    ) -> Result<Option<Asset>> {
        let graph = load_graph(ledger)?;
        let assets: Vec<Asset> = store::get_record(ledger, &asset_key(asset_id))?
            .into_iter()
            .collect();
        Ok(self.filter_assets(&graph, identity, assets).pop())
    }
}

fn load_pair<L: Ledger + ?Sized>(
    tx: &Transaction<'_, L>,
    account_name: &str,
    asset_id: &str,
) -> Result<(Account, Asset)> {
    let account = tx
        .get(&account_key(account_name))?
        .ok_or_else(|| DomainError::UnknownAccount(account_name.to_string()))?;
    let asset = tx
        .get(&asset_key(asset_id))?
        .ok_or_else(|| DomainError::UnknownAsset(asset_id.to_string()))?;
    Ok((account, asset))
}

fn release(
    holdings: &mut std::collections::BTreeMap<String, Leases>,
    holder: &str,
    licenses: &BTreeSet<&str>,
) {
    if let Some(leases) = holdings.get_mut(holder) {
        leases.retain(|license, _| !licenses.contains(license.as_str()));
        if leases.is_empty() {
            holdings.remove(holder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_core::error::Error;
    use blossom_core::utils::PolicyConfig;

    use crate::pdp;
    use crate::store::InMemoryLedger;

    fn asset() -> Asset {
        Asset::new("a1", "Editor", vec!["1".into(), "2".into()], 1.0)
    }

    #[test]
    fn test_onboard_then_view() {
        let mut ledger = InMemoryLedger::new();
        pdp::initialize(&mut ledger, &PolicyConfig::default()).unwrap();
        let identity = PolicyConfig::default().super_identity();
        let decider = AssetDecider::new();

        decider.onboard_asset(&mut ledger, &identity, &asset()).unwrap();
        assert_eq!(decider.asset(&ledger, &identity, "a1").unwrap(), Some(asset()));

        let result = decider.onboard_asset(&mut ledger, &identity, &asset());
        assert!(matches!(
            result,
            Err(Error::Domain(DomainError::AssetExists(_)))
        ));
    }

    #[test]
    fn test_release_keeps_other_leases() {
        let mut holdings = std::collections::BTreeMap::new();
        let leases: Leases = [("1", "2030"), ("2", "2030")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.into()))
            .collect();
        holdings.insert("A1".to_string(), leases);

        release(&mut holdings, "A1", &BTreeSet::from(["1"]));
        assert_eq!(holdings["A1"].keys().collect::<Vec<_>>(), vec!["2"]);

        release(&mut holdings, "A1", &BTreeSet::from(["2"]));
        assert!(!holdings.contains_key("A1"));
    }
}
