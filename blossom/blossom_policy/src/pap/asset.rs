//! Asset policy administration.

use blossom_core::error::Result;
use blossom_core::log_event;
use blossom_core::types::Asset;
use blossom_core::utils::LogLevel;

use crate::graph::Graph;
use crate::model::{NodeType, Properties};
use crate::pap::{account, policy};

/// The object attribute that represents an asset.
pub fn object_attribute(asset_id: &str) -> String {
    format!("assets/{}", asset_id)
}

/// The object that represents a checked out license.
pub fn license_object(asset_id: &str, license: &str) -> String {
    format!("assets/{}/licenses/{}", asset_id, license)
}

fn license_prefix(asset_id: &str) -> String {
    format!("assets/{}/licenses/", asset_id)
}

/// Maintains the graph topology of assets and their checked out licenses.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssetPap;

impl AssetPap {
    /// Create a new asset PAP.
    pub fn new() -> Self {
        Self
    }

    /// Add the object attribute of a new asset under the catalog.
    pub fn onboard(&self, graph: &mut Graph, asset: &Asset) -> Result<()> {
        let oa = object_attribute(&asset.id);
        let mut properties = Properties::new();
        properties.insert("asset".to_string(), asset.id.clone());

        graph.create_node_with_properties(&oa, NodeType::ObjectAttribute, properties)?;
        graph.assign(&oa, policy::ASSETS_OA)?;

        log_event!(LogLevel::Debug, "Asset node added", node => oa);
        Ok(())
    }

    /// Remove the object attribute of an asset and its license objects.
    pub fn offboard(&self, graph: &mut Graph, asset_id: &str) -> Result<()> {
        let oa = object_attribute(asset_id);
        let prefix = license_prefix(asset_id);

        let licenses: Vec<String> = graph
            .children(&oa)
            .filter(|child| {
                child.starts_with(&prefix) && graph.has_node_of_type(child, NodeType::Object)
            })
            .map(str::to_string)
            .collect();

        for license in &licenses {
            graph.remove_node(license)?;
        }
        graph.remove_node(&oa)?;

        log_event!(LogLevel::Debug, "Asset node removed",
            node => oa,
            licenses => licenses.len(),
        );
        Ok(())
    }

    /// Create the license objects of a checkout.
    ///
    /// Each license object sits under both the asset and the account that
    /// holds it, so it is governed by the account's status as well.
    pub fn checkout<'a>(
        &self,
        graph: &mut Graph,
        account_name: &str,
        asset_id: &str,
        licenses: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        let asset_oa = object_attribute(asset_id);
        let account_oa = account::object_attribute(account_name);

        for license in licenses {
            let object = license_object(asset_id, license);
            let mut properties = Properties::new();
            properties.insert("account".to_string(), account_name.to_string());

            graph.create_node_with_properties(&object, NodeType::Object, properties)?;
            graph.assign(&object, &asset_oa)?;
            graph.assign(&object, &account_oa)?;
        }
        Ok(())
    }

    /// Remove the license objects of a checkin.
    pub fn checkin<'a>(
        &self,
        graph: &mut Graph,
        asset_id: &str,
        licenses: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        for license in licenses {
            graph.remove_node(&license_object(asset_id, license))?;
        }
        Ok(())
    }
}
