use blossom_core::types::{Account, Role, Users};
use blossom_core::utils::PolicyConfig;
use blossom_policy::pap::{self, policy};
use blossom_policy::{
    AccountPap, Decision, Graph, NodeType, Operation, OperationSet, PolicyEvaluator,
};

fn account() -> Account {
    Account::new(
        "A1",
        "A1MSP",
        Users {
            system_owner: "owner".to_string(),
            system_administrator: "admin".to_string(),
            acquisition_specialist: "acq".to_string(),
        },
    )
}

fn skeleton_with_account() -> Graph {
    let mut graph = pap::bootstrap(&PolicyConfig::default()).unwrap();
    AccountPap::new().request(&mut graph, &account()).unwrap();
    graph
}

#[test]
fn test_pending_account_is_limited_by_status_class() {
    let graph = skeleton_with_account();
    let evaluator = PolicyEvaluator::new(&graph);
    let admin = account().identity(Role::SystemAdministrator);

    let privileges = evaluator.privileges(admin.as_str(), "accounts/A1");
    assert_eq!(
        privileges.for_policy_class(policy::RBAC_PC),
        Some(&OperationSet::from([
            Operation::ViewAccount,
            Operation::Checkout,
            Operation::Checkin,
            Operation::ReportSwID,
            Operation::ViewSwID,
        ]))
    );
    assert_eq!(
        privileges.for_policy_class(policy::STATUS_PC),
        Some(&OperationSet::from([Operation::ViewAccount]))
    );
    assert_eq!(
        privileges.granted(),
        OperationSet::from([Operation::ViewAccount])
    );
}

#[test]
fn test_approval_widens_privileges() {
    let mut graph = skeleton_with_account();
    let admin = account().identity(Role::SystemAdministrator);

    let before = PolicyEvaluator::new(&graph).granted_operations(admin.as_str(), "accounts/A1");

    AccountPap::new()
        .update_status(
            &mut graph,
            "A1",
            blossom_core::types::AccountStatus::Approved,
        )
        .unwrap();
    let after = PolicyEvaluator::new(&graph).granted_operations(admin.as_str(), "accounts/A1");

    assert!(!before.contains(Operation::Checkout));
    assert!(after.contains(Operation::Checkout));
    assert!(before.iter().all(|op| after.contains(op)));
}

#[test]
fn test_adding_associations_never_removes_privileges() {
    let mut graph = skeleton_with_account();
    let owner = account().identity(Role::SystemOwner);

    let targets = ["accounts/A1", policy::ASSETS_OA, policy::ACCOUNTS_OA];
    let before: Vec<OperationSet> = targets
        .iter()
        .map(|t| PolicyEvaluator::new(&graph).granted_operations(owner.as_str(), t))
        .collect();

    graph
        .associate(
            "accounts/A1/SystemOwner",
            policy::ASSETS_OA,
            OperationSet::from([Operation::ViewAllLicenses]),
        )
        .unwrap();
    graph
        .associate(
            policy::PENDING_UA,
            policy::STATUS_ACCOUNTS_OA,
            OperationSet::from([Operation::ViewAccount, Operation::ViewSwID]),
        )
        .unwrap();

    for (target, earlier) in targets.iter().zip(before) {
        let now = PolicyEvaluator::new(&graph).granted_operations(owner.as_str(), target);
        assert!(
            earlier.iter().all(|op| now.contains(op)),
            "privileges on {} shrank from {} to {}",
            target,
            earlier,
            now
        );
    }
}

#[test]
fn test_adding_assignments_never_removes_privileges() {
    let mut graph = skeleton_with_account();
    let owner = account().identity(Role::SystemOwner);

    let targets = ["accounts/A1", policy::ASSETS_OA, policy::ACCOUNTS_OA];
    let before: Vec<OperationSet> = targets
        .iter()
        .map(|t| PolicyEvaluator::new(&graph).granted_operations(owner.as_str(), t))
        .collect();

    // Place the owner's role attribute under another role in the same class
    graph
        .assign("accounts/A1/SystemOwner", "RBAC.AcquisitionSpecialist")
        .unwrap();
    graph.assign(owner.as_str(), policy::ACTIVE_UA).unwrap();

    for (target, earlier) in targets.iter().zip(before) {
        let now = PolicyEvaluator::new(&graph).granted_operations(owner.as_str(), target);
        assert!(
            earlier.iter().all(|op| now.contains(op)),
            "privileges on {} shrank from {} to {}",
            target,
            earlier,
            now
        );
    }

    assert!(PolicyEvaluator::new(&graph)
        .decide(owner.as_str(), policy::ASSETS_OA, Operation::ViewAllLicenses)
        .is_allowed());
}

#[test]
fn test_new_governing_class_can_only_narrow() {
    let mut graph = skeleton_with_account();
    let super_user = PolicyConfig::default().super_identity();

    assert!(PolicyEvaluator::new(&graph)
        .decide(super_user.as_str(), policy::ASSETS_OA, Operation::OnboardAsset)
        .is_allowed());

    // Put the catalog under a new class that grants nothing
    graph.create_node("Audit", NodeType::PolicyClass).unwrap();
    graph.create_node("Audit.assets", NodeType::ObjectAttribute).unwrap();
    graph.assign("Audit.assets", "Audit").unwrap();
    graph.assign(policy::ASSETS_OA, "Audit.assets").unwrap();

    assert_eq!(
        PolicyEvaluator::new(&graph).decide(
            super_user.as_str(),
            policy::ASSETS_OA,
            Operation::OnboardAsset
        ),
        Decision::Denied
    );
}

#[test]
fn test_evaluation_does_not_mutate_graph() {
    let graph = skeleton_with_account();
    let bytes = graph.to_bytes().unwrap();

    let evaluator = PolicyEvaluator::new(&graph);
    for op in Operation::ALL {
        evaluator.decide("owner:A1MSP", "accounts/A1", op);
    }

    assert_eq!(graph.to_bytes().unwrap(), bytes);
}

#[test]
fn test_ascendants_of_account_user() {
    let graph = skeleton_with_account();
    let evaluator = PolicyEvaluator::new(&graph);

    let asc = evaluator.ascendants("acq:A1MSP");
    let expected = [
        "RBAC",
        "RBAC.AcquisitionSpecialist",
        "Status",
        "Status.pending",
        "accounts/A1/AcquisitionSpecialist",
        "accounts/A1/members",
        "acq:A1MSP",
    ];
    assert_eq!(asc.into_iter().collect::<Vec<_>>(), expected.to_vec());
}
