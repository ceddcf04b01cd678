// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "resource-guard")]
#[command(about = "Validate request fields and safely upload rule, decoder and list files")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Installation directory (overrides GUARD_INSTALL_DIR and the settings file)
    #[arg(short, long, global = true)]
    pub install_dir: Option<PathBuf>,

    /// Path to a settings file (overrides GUARD_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check that a path stays inside the installation directory
    CheckPath {
        /// Path to check
        path: String,
        /// Treat the path as absolute instead of relative to the installation directory
        #[arg(long)]
        absolute: bool,
    },
    /// Check a value against a named format
    CheckFormat {
        /// Format name (see `formats`)
        name: String,
        /// Value to check
        value: String,
    },
    /// List every registered format
    Formats,
    /// Check a rule or decoder file under the installation directory
    ValidateXml {
        /// Path relative to the installation directory
        path: String,

        /// Require a single root element, as in configuration files
        #[arg(long)]
        document: bool,
    },
    /// Check a CDB list under the installation directory
    ValidateList {
        /// Path relative to the installation directory
        path: String,
    },
    /// Upload a rule or decoder file
    UploadXml {
        /// Local file to upload ("-" reads stdin)
        file: PathBuf,
        /// Destination relative to the installation directory (e.g., "etc/rules/local_rules.xml")
        destination: String,
    },
    /// Upload a CDB list
    UploadList {
        /// Local file to upload ("-" reads stdin)
        file: PathBuf,
        /// Destination relative to the installation directory (e.g., "etc/lists/audit-keys")
        destination: String,
    },
    /// Validate a JSON document against a JSON schema using the registered formats
    ValidateRequest {
        /// JSON schema file
        schema: PathBuf,
        /// JSON document ("-" reads stdin)
        document: PathBuf,
    },
    /// Validate an API configuration file (YAML)
    ValidateConfig {
        /// Configuration file
        file: PathBuf,
        /// Validate against the security configuration schema instead
        #[arg(long)]
        security: bool,
    },
}
