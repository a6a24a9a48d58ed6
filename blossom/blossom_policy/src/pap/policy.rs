//! Policy skeleton.
//!
//! Two policy classes govern every resource. `RBAC` decides what each role
//! may do and `Status` withholds everything but viewing from accounts that
//! have not been approved. Because privileges are intersected across
//! classes, an operation has to be granted by both.
//!
//! The skeleton only carries the super administrator's status grant. Every
//! account gets its own status association from its members to its object
//! attribute, so approval of one account never reaches another.

use blossom_core::error::{Error, Result};
use blossom_core::log_event;
use blossom_core::types::{AccountStatus, Role};
use blossom_core::utils::{LogLevel, PolicyConfig};

use crate::graph::Graph;
use crate::model::{NodeType, Operation, OperationSet};

use Operation::*;

/// Role based policy class.
pub const RBAC_PC: &str = "RBAC";

/// Account status policy class.
pub const STATUS_PC: &str = "Status";

/// User attribute of the super administrator.
pub const SUPER_UA: &str = "RBAC.super";

/// Object attribute containing every asset.
pub const ASSETS_OA: &str = "RBAC.assets";

/// Object attribute containing every account.
pub const ACCOUNTS_OA: &str = "RBAC.accounts";

/// Object attribute containing every SwID record.
pub const SWIDS_OA: &str = "RBAC.swids";

/// User attribute of approved accounts.
pub const ACTIVE_UA: &str = "Status.active";

/// User attribute of accounts awaiting approval.
pub const PENDING_UA: &str = "Status.pending";

/// Object attribute containing every account, under the status class.
pub const STATUS_ACCOUNTS_OA: &str = "Status.accounts";

/// The RBAC user attribute that every account's role attribute sits under.
pub fn role_attribute(role: Role) -> String {
    format!("RBAC.{}", role)
}

const SUPER_ASSET_OPS: &[Operation] = &[
    OnboardAsset,
    OffboardAsset,
    ViewAsset,
    ViewAllLicenses,
    ViewAvailableLicenses,
    ViewCheckedOut,
    ViewSwID,
];

const SUPER_ACCOUNT_OPS: &[Operation] = &[RequestAccount, ApproveAccount, ViewAccount, ViewSwID];

const ACTIVE_OPS: &[Operation] = &[
    ApproveAccount,
    ViewAccount,
    Checkout,
    Checkin,
    ReportSwID,
    ViewSwID,
];

const PENDING_OPS: &[Operation] = &[ViewAccount];

/// Operations the status class grants the members of an account in the given
/// status. Rejected and revoked accounts are granted nothing.
pub fn status_operations(status: AccountStatus) -> &'static [Operation] {
    match status {
        AccountStatus::Approved => ACTIVE_OPS,
        AccountStatus::Pending => PENDING_OPS,
        AccountStatus::Rejected | AccountStatus::Revoked => &[],
    }
}

/// Operations each role holds on the asset catalog.
pub fn catalog_operations(role: Role) -> &'static [Operation] {
    match role {
        Role::SystemOwner => &[ViewAsset],
        Role::SystemAdministrator => &[ViewAsset, ViewAvailableLicenses, Checkout, Checkin],
        Role::AcquisitionSpecialist => &[
            ViewAsset,
            ViewAllLicenses,
            ViewAvailableLicenses,
            ViewCheckedOut,
        ],
    }
}

/// Operations each role holds on its own account.
pub fn account_operations(role: Role) -> &'static [Operation] {
    match role {
        Role::SystemOwner => &[ViewAccount, ViewSwID],
        Role::SystemAdministrator => &[ViewAccount, Checkout, Checkin, ReportSwID, ViewSwID],
        Role::AcquisitionSpecialist => &[ViewAccount, ViewSwID],
    }
}

/// Build the policy skeleton into an empty graph.
///
/// # Arguments
///
/// * `graph` - The graph to configure.
/// * `config` - Names of the super administrator.
///
/// # Returns
///
/// * `Ok(())` - If the skeleton was created.
/// * `Err(Error::Configuration)` - If the skeleton clashes with existing nodes.
pub fn configure(graph: &mut Graph, config: &PolicyConfig) -> Result<()> {
    build_skeleton(graph, config)
        .map_err(|e| Error::Configuration(format!("failed to build policy skeleton: {}", e)))?;

    log_event!(LogLevel::Info, "Policy skeleton configured",
        super_user => config.super_identity(),
        nodes => graph.len(),
    );

    Ok(())
}

/// Create a new graph holding only the policy skeleton.
pub fn bootstrap(config: &PolicyConfig) -> Result<Graph> {
    config.validate()?;
    let mut graph = Graph::new();
    configure(&mut graph, config)?;
    Ok(graph)
}

fn build_skeleton(graph: &mut Graph, config: &PolicyConfig) -> crate::graph::GraphResult<()> {
    graph.create_node(RBAC_PC, NodeType::PolicyClass)?;
    graph.create_node(STATUS_PC, NodeType::PolicyClass)?;

    // RBAC
    graph.create_node(SUPER_UA, NodeType::UserAttribute)?;
    graph.assign(SUPER_UA, RBAC_PC)?;
    for role in Role::ALL {
        let ua = role_attribute(role);
        graph.create_node(&ua, NodeType::UserAttribute)?;
        graph.assign(&ua, RBAC_PC)?;
    }
    for oa in [ASSETS_OA, ACCOUNTS_OA, SWIDS_OA] {
        graph.create_node(oa, NodeType::ObjectAttribute)?;
        graph.assign(oa, RBAC_PC)?;
    }

    // Status
    for ua in [ACTIVE_UA, PENDING_UA] {
        graph.create_node(ua, NodeType::UserAttribute)?;
        graph.assign(ua, STATUS_PC)?;
    }
    graph.create_node(STATUS_ACCOUNTS_OA, NodeType::ObjectAttribute)?;
    graph.assign(STATUS_ACCOUNTS_OA, STATUS_PC)?;

    // The super administrator is always active
    graph.assign(SUPER_UA, ACTIVE_UA)?;
    let super_user = config.super_identity();
    graph.create_node(super_user.as_str(), NodeType::User)?;
    graph.assign(super_user.as_str(), SUPER_UA)?;

    graph.associate(SUPER_UA, ASSETS_OA, OperationSet::from(SUPER_ASSET_OPS))?;
    graph.associate(SUPER_UA, ACCOUNTS_OA, OperationSet::from(SUPER_ACCOUNT_OPS))?;
    graph.associate(SUPER_UA, SWIDS_OA, OperationSet::from([ViewSwID]))?;
    for role in Role::ALL {
        graph.associate(
            &role_attribute(role),
            ASSETS_OA,
            OperationSet::from(catalog_operations(role)),
        )?;
    }

    graph.associate(SUPER_UA, STATUS_ACCOUNTS_OA, OperationSet::from(ACTIVE_OPS))?;

    Ok(())
}
