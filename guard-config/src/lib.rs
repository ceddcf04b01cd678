//! Installation layout and configuration for Resource Guard.
//!
//! ## Main Features
//! - Installation directory resolution and the managed subtree layout
//! - YAML runtime settings ([`GuardSettings`])
//! - Schemas for the API and security configuration files

pub mod api_schema;
pub mod paths;
pub mod settings;

pub use api_schema::{allowed_fields, validate_api_config, validate_security_config};
pub use paths::InstallLayout;
pub use settings::GuardSettings;
