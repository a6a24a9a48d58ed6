//! Domain data types.
//!
//! These are the records the ledger stores and the deciders mutate. Only
//! the fields that authorization and the licensing invariants inspect are
//! modelled. Every map is ordered so that serialization is deterministic.

pub mod account;
pub mod asset;
pub mod identity;
pub mod swid;

pub use account::{Account, AccountStatus, Role, Users};
pub use asset::{Asset, DateTime, Leases};
pub use identity::Identity;
pub use swid::SwID;

/// Separator of the path-like names domain objects get in the policy graph.
pub const NAME_SEPARATOR: char = '/';

/// Why `value` cannot identify a domain object, if it cannot.
pub(crate) fn identifier_problem(what: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{} is empty", what))
    } else if value.contains(NAME_SEPARATOR) {
        Some(format!("{} {:?} contains '{}'", what, value, NAME_SEPARATOR))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_problem() {
        assert_eq!(identifier_problem("asset ID", "asset1"), None);
        assert!(identifier_problem("asset ID", " ").is_some());
        assert_eq!(
            identifier_problem("account name", "B/members").as_deref(),
            Some("account name \"B/members\" contains '/'")
        );
    }
}
