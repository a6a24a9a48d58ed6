//! Decision commands.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use blossom_policy::{Operation, OperationSet, PolicyEvaluator, Privileges};

use super::load_graph;

/// Print whether `identity` holds `operation` on `target`.
pub fn decide(path: &Path, identity: &str, target: &str, operation: Operation) -> Result<()> {
    let graph = load_graph(path)?;
    let decision = PolicyEvaluator::new(&graph).decide(identity, target, operation);

    println!("{}", decision);
    Ok(())
}

#[derive(Serialize)]
struct PrivilegeReport<'a> {
    identity: &'a str,
    target: &'a str,
    policy_classes: &'a Privileges,
    granted: OperationSet,
}

/// Print the privileges of `identity` on `target`.
pub fn privileges(path: &Path, identity: &str, target: &str, json: bool) -> Result<()> {
    let graph = load_graph(path)?;
    let privileges = PolicyEvaluator::new(&graph).privileges(identity, target);
    let granted = privileges.granted();

    if json {
        let report = PrivilegeReport {
            identity,
            target,
            policy_classes: &privileges,
            granted,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !privileges.is_governed() {
        println!("{} is not governed by any policy class", target);
    }
    for (pc, ops) in privileges.policy_classes() {
        println!("{}: {}", pc, ops);
    }
    println!("granted: {}", granted);
    Ok(())
}
