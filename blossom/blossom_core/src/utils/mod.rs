//! Utility functions and types.
//!
//! This module provides the logging and configuration utilities shared by
//! the library crates and the command-line interface.

pub mod config;
pub mod logging;

pub use config::{BlossomConfig, LoggingConfig, PolicyConfig};
pub use logging::LogLevel;
