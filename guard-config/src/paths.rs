use std::env;
use std::path::{Path, PathBuf};

use guard_common::platform::absolutize;

/// Overrides the installation directory.
pub const INSTALL_DIR_ENV: &str = "GUARD_INSTALL_DIR";
/// Overrides the settings file location.
pub const CONFIG_ENV: &str = "GUARD_CONFIG";

pub const DEFAULT_INSTALL_DIR: &str = "/var/ossec";
pub const DEFAULT_STAGING_DIR: &str = "tmp";
/// Settings file, relative to the installation directory.
pub const SETTINGS_FILE: &str = "api/configuration/guard.yaml";

pub const RULES_DIR: &str = "etc/rules";
pub const DECODERS_DIR: &str = "etc/decoders";
pub const LISTS_DIR: &str = "etc/lists";
pub const RULESET_RULES_DIR: &str = "ruleset/rules";
pub const RULESET_DECODERS_DIR: &str = "ruleset/decoders";

/// Installation directory from the environment, if set and non-empty.
pub fn install_dir_from_env() -> Option<PathBuf> {
    env::var_os(INSTALL_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Settings file location.
/// Priority order:
/// 1. GUARD_CONFIG environment variable
/// 2. `<install>/api/configuration/guard.yaml`, where install comes from
///    GUARD_INSTALL_DIR or the default
pub fn settings_path() -> PathBuf {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }
    install_dir_from_env()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_DIR))
        .join(SETTINGS_FILE)
}

/// Directory layout of a manager installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: PathBuf,
    staging: PathBuf,
}

impl InstallLayout {
    /// Layout rooted at `root` with staging under `root/<staging_dir>`.
    ///
    /// `root` is made absolute lexically; symlinks are resolved later, by the
    /// path guard, on every check.
    pub fn new(root: &Path, staging_dir: &Path) -> std::io::Result<Self> {
        let root = absolutize(root)?;
        let staging = root.join(staging_dir);
        Ok(Self { root, staging })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging
    }

    pub fn rules_dir(&self) -> PathBuf {
        self.root.join(RULES_DIR)
    }

    pub fn decoders_dir(&self) -> PathBuf {
        self.root.join(DECODERS_DIR)
    }

    pub fn lists_dir(&self) -> PathBuf {
        self.root.join(LISTS_DIR)
    }

    /// The user-editable and shipped resource trees, in that order.
    pub fn resource_dirs(&self) -> [PathBuf; 5] {
        [
            self.rules_dir(),
            self.decoders_dir(),
            self.lists_dir(),
            self.root.join(RULESET_RULES_DIR),
            self.root.join(RULESET_DECODERS_DIR),
        ]
    }
}
