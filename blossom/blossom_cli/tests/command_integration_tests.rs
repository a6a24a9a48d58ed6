use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn bootstrap_graph(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("graph.json");

    Command::cargo_bin("blossom_cli")
        .unwrap()
        .args(["bootstrap", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote policy graph"));

    path
}

fn cli(graph: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    Command::cargo_bin("blossom_cli")
        .unwrap()
        .args(args)
        .arg("--graph")
        .arg(graph)
        .assert()
}

#[test]
fn test_bootstrap_writes_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = bootstrap_graph(&dir);

    let snapshot: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let nodes = snapshot["nodes"].as_array().unwrap();
    assert!(nodes.iter().any(|n| n["name"] == "super:BlossomMSP"));
}

#[test]
fn test_bootstrap_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let first = bootstrap_graph(&dir);
    let first_bytes = fs::read(&first).unwrap();

    let other = TempDir::new().unwrap();
    let second = bootstrap_graph(&other);

    assert_eq!(first_bytes, fs::read(second).unwrap());
}

#[test]
fn test_bootstrap_with_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("blossom.toml");
    fs::write(
        &config,
        "[policy]\nadmin_msp = \"OrgMSP\"\nsuper_user = \"root\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();
    let graph = dir.path().join("graph.json");

    Command::cargo_bin("blossom_cli")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["bootstrap", "--output"])
        .arg(&graph)
        .assert()
        .success();

    cli(&graph, &["inspect", "--node", "root:OrgMSP"])
        .success()
        .stdout(predicate::str::contains("parent    RBAC.super"));
}

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("blossom_cli")
        .unwrap()
        .args(["--config", "/nonexistent/blossom.toml", "bootstrap", "--output"])
        .arg(dir.path().join("graph.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_decide_command() {
    let dir = TempDir::new().unwrap();
    let graph = bootstrap_graph(&dir);

    cli(
        &graph,
        &[
            "decide",
            "--identity",
            "super:BlossomMSP",
            "--target",
            "RBAC.assets",
            "--operation",
            "onboard_asset",
        ],
    )
    .success()
    .stdout("allowed\n");

    cli(
        &graph,
        &[
            "decide",
            "--identity",
            "super:BlossomMSP",
            "--target",
            "RBAC.assets",
            "--operation",
            "checkout",
        ],
    )
    .success()
    .stdout("denied\n");
}

#[test]
fn test_decide_rejects_unknown_operation() {
    let dir = TempDir::new().unwrap();
    let graph = bootstrap_graph(&dir);

    cli(
        &graph,
        &[
            "decide",
            "--identity",
            "super:BlossomMSP",
            "--target",
            "RBAC.assets",
            "--operation",
            "launch_rockets",
        ],
    )
    .failure()
    .stderr(predicate::str::contains("unknown operation"));
}

#[test]
fn test_privileges_command() {
    let dir = TempDir::new().unwrap();
    let graph = bootstrap_graph(&dir);

    cli(
        &graph,
        &[
            "privileges",
            "--identity",
            "super:BlossomMSP",
            "--target",
            "RBAC.swids",
        ],
    )
    .success()
    .stdout(predicate::str::contains("RBAC: {view_swid}"))
    .stdout(predicate::str::contains("granted: {view_swid}"));

    let output = cli(
        &graph,
        &[
            "privileges",
            "--identity",
            "super:BlossomMSP",
            "--target",
            "RBAC.swids",
            "--json",
        ],
    )
    .success()
    .get_output()
    .stdout
    .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["granted"], serde_json::json!(["view_swid"]));
    assert_eq!(report["policy_classes"]["RBAC"], serde_json::json!(["view_swid"]));
}

#[test]
fn test_privileges_on_unknown_target() {
    let dir = TempDir::new().unwrap();
    let graph = bootstrap_graph(&dir);

    cli(
        &graph,
        &[
            "privileges",
            "--identity",
            "super:BlossomMSP",
            "--target",
            "assets/ghost",
        ],
    )
    .success()
    .stdout(predicate::str::contains("not governed"))
    .stdout(predicate::str::contains("granted: {}"));
}

#[test]
fn test_inspect_lists_nodes() {
    let dir = TempDir::new().unwrap();
    let graph = bootstrap_graph(&dir);

    cli(&graph, &["inspect"])
        .success()
        .stdout(predicate::str::contains("PolicyClass\tRBAC"))
        .stdout(predicate::str::contains("User\tsuper:BlossomMSP"));

    cli(&graph, &["inspect", "--node", "RBAC.super"])
        .success()
        .stdout(predicate::str::contains("parent    Status.active"))
        .stdout(predicate::str::contains("grants    RBAC.swids {view_swid}"));

    cli(&graph, &["inspect", "--node", "nothing"])
        .failure()
        .stderr(predicate::str::contains("no node named nothing"));
}

#[test]
fn test_corrupt_graph_fails() {
    let dir = TempDir::new().unwrap();
    let graph = dir.path().join("graph.json");
    fs::write(&graph, "{ not json").unwrap();

    cli(&graph, &["inspect"])
        .failure()
        .stderr(predicate::str::contains("failed to load graph"));
}
