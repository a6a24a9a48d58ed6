//! Policy administration points.
//!
//! The PAPs translate domain events into graph mutations. They are the only
//! code that knows how the domain is laid out as nodes, and they trust the
//! caller to have decided that the mutation is allowed.

pub mod account;
pub mod asset;
pub mod policy;
pub mod swid;

pub use account::AccountPap;
pub use asset::AssetPap;
pub use policy::{bootstrap, configure};
pub use swid::SwIDPap;
