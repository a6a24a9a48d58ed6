//! SwID policy administration.

use blossom_core::error::Result;
use blossom_core::types::SwID;

use crate::graph::Graph;
use crate::model::NodeType;
use crate::pap::{account, asset, policy};

/// The object attribute that represents a SwID record.
pub fn object_attribute(primary_tag: &str) -> String {
    format!("swids/{}", primary_tag)
}

/// Maintains the graph topology of SwID records.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwIDPap;

impl SwIDPap {
    /// Create a new SwID PAP.
    pub fn new() -> Self {
        Self
    }

    /// Add the object attribute of a reported SwID.
    ///
    /// A SwID reported again under the same tag replaces the earlier node,
    /// so it is always placed under the latest reporting account.
    pub fn report(&self, graph: &mut Graph, swid: &SwID, account_name: &str) -> Result<()> {
        let oa = object_attribute(&swid.primary_tag);
        if graph.contains(&oa) {
            graph.remove_node(&oa)?;
        }

        graph.create_node(&oa, NodeType::ObjectAttribute)?;
        graph.assign(&oa, policy::SWIDS_OA)?;
        graph.assign(&oa, &account::object_attribute(account_name))?;
        graph.assign(&oa, &asset::object_attribute(&swid.asset))?;
        Ok(())
    }
}
