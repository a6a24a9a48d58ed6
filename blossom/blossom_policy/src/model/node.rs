//! Attribute graph node model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Opaque key/value properties attached to a node.
pub type Properties = BTreeMap<String, String>;

/// The type of an attribute graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// A root scoping boundary.
    PolicyClass,

    /// A grouping of objects.
    ObjectAttribute,

    /// A grouping of users.
    UserAttribute,

    /// A concrete protected resource.
    Object,

    /// A concrete identity.
    User,
}

impl NodeType {
    /// Get the name of this node type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PolicyClass => "PolicyClass",
            Self::ObjectAttribute => "ObjectAttribute",
            Self::UserAttribute => "UserAttribute",
            Self::Object => "Object",
            Self::User => "User",
        }
    }

    /// Whether a node of this type may be the source of an association.
    pub fn is_user_side(&self) -> bool {
        matches!(self, Self::User | Self::UserAttribute)
    }

    /// Whether a node of this type may be the target of an association.
    pub fn is_object_side(&self) -> bool {
        matches!(self, Self::Object | Self::ObjectAttribute)
    }

    /// Whether a node of this type may be assigned under a node of `parent` type.
    pub fn can_assign_to(&self, parent: NodeType) -> bool {
        match self {
            Self::PolicyClass => false,
            Self::User => parent == Self::UserAttribute,
            Self::UserAttribute => matches!(parent, Self::UserAttribute | Self::PolicyClass),
            Self::Object => parent == Self::ObjectAttribute,
            Self::ObjectAttribute => matches!(parent, Self::ObjectAttribute | Self::PolicyClass),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PolicyClass" | "pc" => Ok(Self::PolicyClass),
            "ObjectAttribute" | "oa" => Ok(Self::ObjectAttribute),
            "UserAttribute" | "ua" => Ok(Self::UserAttribute),
            "Object" | "o" => Ok(Self::Object),
            "User" | "u" => Ok(Self::User),
            _ => Err(format!("invalid node type: {}", s)),
        }
    }
}

/// A node of the attribute graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The unique name of this node.
    pub name: String,

    /// The type of this node.
    pub node_type: NodeType,

    /// Opaque properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

impl Node {
    /// Create a node without properties.
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            properties: Properties::new(),
        }
    }

    /// Attach a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.node_type)
    }
}
