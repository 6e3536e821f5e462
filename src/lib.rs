//! vaas-agent Library
//!
//! This module exposes the registration agent's components for use in
//! integration tests and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod registration;
pub mod shutdown;

// Re-export commonly used types
pub use api::{Backend, Client, Dc, Director, VaasApi, VaasError};
pub use config::{load_config, Config, ConfigError};
pub use registration::Registrar;
