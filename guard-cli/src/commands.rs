// Command handlers

use std::path::Path;

use anyhow::{Context, Result};
use guard_common::platform::{portable_relative_path, realpath_lenient};
use guard_common::{confine, FileOps};
use guard_config::api_schema::parse_config_yaml;
use guard_config::{validate_api_config, validate_security_config, GuardSettings, InstallLayout};
use guard_core::{guard_println, guard_success, GuardError};
use guard_formats::{FormatRegistry, RequestValidator};
use guard_upload::{ResourceManager, UploadOutcome};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Args, Command};

/// Main command dispatcher
pub fn execute_command(args: Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => GuardSettings::load_from(path)?,
        None => GuardSettings::load()?,
    };
    let layout = match &args.install_dir {
        Some(dir) => InstallLayout::new(dir, &settings.staging_dir)
            .with_context(|| format!("Failed to resolve {}", dir.display()))?,
        None => settings.layout()?,
    };
    debug!(install_dir = %layout.root().display(), "resolved installation");
    let layout_root = layout.root().to_path_buf();

    match args.command {
        Command::CheckPath { path, absolute } => {
            let resolved = confine(&path, layout.root(), !absolute)?;
            guard_println!("{}", resolved.display());
        }
        Command::CheckFormat { name, value } => {
            let registry = FormatRegistry::with_defaults(layout.root());
            if !registry.check_str(&name, &value)? {
                return Err(GuardError::ValidationRejected(vec![format!(
                    "'{}' does not match format '{}'",
                    value, name
                )])
                .into());
            }
            guard_println!("valid");
        }
        Command::Formats => {
            let registry = FormatRegistry::with_defaults(layout.root());
            for name in registry.names() {
                guard_println!("{}", name);
            }
        }
        Command::ValidateXml { path, document } => {
            let manager = manager(layout, &settings);
            let valid = if document {
                manager.validate_xml_document(&path)?
            } else {
                manager.validate_xml(&path)?
            };
            if !valid {
                return Err(GuardError::MalformedXml(format!("{} is not well-formed", path)).into());
            }
            guard_success!("{} is well-formed", path);
        }
        Command::ValidateList { path } => {
            let manager = manager(layout, &settings);
            if !manager.validate_cdb_list(&path)? {
                return Err(
                    GuardError::MalformedList(format!("{} is not a valid CDB list", path)).into(),
                );
            }
            guard_success!("{} is a valid CDB list", path);
        }
        Command::UploadXml { file, destination } => {
            let content = FileOps::read_file_or_stdin(&file)?;
            let outcome = manager(layout, &settings).upload_xml(&content, &destination)?;
            report_upload(&layout_root, &outcome);
        }
        Command::UploadList { file, destination } => {
            let content = FileOps::read_file_or_stdin(&file)?;
            let outcome = manager(layout, &settings).upload_list(&content, &destination)?;
            report_upload(&layout_root, &outcome);
        }
        Command::ValidateRequest { schema, document } => {
            let registry = FormatRegistry::with_defaults(layout.root());
            let schema = read_json(&schema)?;
            let document = read_json(&document)?;
            RequestValidator::new(&registry, schema)?.validate(&document)?;
            guard_println!("valid");
        }
        Command::ValidateConfig { file, security } => {
            let content = FileOps::read_file_with_context(&file)?;
            let config = parse_config_yaml(&content)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            if security {
                validate_security_config(&config)?;
            } else {
                validate_api_config(&config)?;
            }
            guard_println!("valid");
        }
    }
    Ok(())
}

fn manager(layout: InstallLayout, settings: &GuardSettings) -> ResourceManager {
    ResourceManager::new(layout).with_upload_limit(settings.upload_limit())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = FileOps::read_file_or_stdin(path)?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

fn report_upload(install_dir: &Path, outcome: &UploadOutcome) {
    // Relative to the installation when possible, like the destination argument.
    let base = realpath_lenient(install_dir).unwrap_or_else(|_| install_dir.to_path_buf());
    let shown = portable_relative_path(&base, &outcome.destination)
        .unwrap_or_else(|| outcome.destination.clone());
    guard_println!("{}", shown.display());
    guard_success!("Uploaded {} bytes ({})", outcome.bytes, outcome.kind);
}
