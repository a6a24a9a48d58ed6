//! Configuration utilities.
//!
//! Configuration is read from TOML. Every section and field has a default,
//! so an empty document is a valid configuration.
//!
//! ```toml
//! [policy]
//! admin_msp = "BlossomMSP"
//! super_user = "super"
//!
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Identity;
use crate::utils::LogLevel;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlossomConfig {
    /// Policy skeleton settings.
    pub policy: PolicyConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl BlossomConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check that the configuration can produce a usable policy skeleton.
    pub fn validate(&self) -> Result<()> {
        self.policy.validate()
    }
}

/// Settings for the bootstrap policy skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// MSP of the administering organization.
    pub admin_msp: String,

    /// Common name of the super user within the administering MSP.
    pub super_user: String,
}

impl PolicyConfig {
    /// The identity granted full access by the bootstrap skeleton.
    pub fn super_identity(&self) -> Identity {
        Identity::from_parts(&self.super_user, &self.admin_msp)
    }

    /// Check that both names are set.
    pub fn validate(&self) -> Result<()> {
        if self.admin_msp.trim().is_empty() {
            return Err(Error::Configuration("policy.admin_msp is empty".to_string()));
        }
        if self.super_user.trim().is_empty() {
            return Err(Error::Configuration("policy.super_user is empty".to_string()));
        }
        Ok(())
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            admin_msp: "BlossomMSP".to_string(),
            super_user: "super".to_string(),
        }
    }
}

/// Settings for the logging backend chosen by a binary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// The base log level.
    pub level: LogLevel,
}
