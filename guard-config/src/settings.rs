//! Runtime settings for the guard.
//!
//! Settings live in a small YAML file (see [`crate::paths::settings_path`]).
//! Every field has a default, so a missing default-location file is the same
//! as an empty one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use guard_core::error::{GuardError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::paths::{self, InstallLayout};

/// 10 MiB.
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10_485_760;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardSettings {
    /// Installation directory; GUARD_INSTALL_DIR takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// Staging directory, relative to the installation directory.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Largest accepted upload in bytes; 0 disables the limit.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_STAGING_DIR)
}

fn default_max_upload_size() -> u64 {
    DEFAULT_MAX_UPLOAD_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            install_dir: None,
            staging_dir: default_staging_dir(),
            max_upload_size: default_max_upload_size(),
            log_level: default_log_level(),
        }
    }
}

impl GuardSettings {
    /// Load from the resolved settings location.
    ///
    /// A file explicitly named by GUARD_CONFIG must exist; the default
    /// location may be absent.
    pub fn load() -> Result<Self> {
        let path = paths::settings_path();
        let explicit = std::env::var_os(paths::CONFIG_ENV).is_some_and(|v| !v.is_empty());
        match fs::read_to_string(&path) {
            Ok(content) => Self::from_yaml(&content)
                .map_err(|e| GuardError::Config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound && !explicit => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(GuardError::Config(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Load from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| GuardError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
            .map_err(|e| GuardError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(content)?
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let escapes = self.staging_dir.as_os_str().is_empty()
            || self
                .staging_dir
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(GuardError::Config(format!(
                "staging_dir must be a plain relative path, got '{}'",
                self.staging_dir.display()
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(GuardError::Config(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        Ok(())
    }

    /// Resolved installation directory: GUARD_INSTALL_DIR, then the
    /// settings file, then the default.
    pub fn install_dir(&self) -> PathBuf {
        paths::install_dir_from_env()
            .or_else(|| self.install_dir.clone())
            .unwrap_or_else(|| PathBuf::from(paths::DEFAULT_INSTALL_DIR))
    }

    pub fn layout(&self) -> Result<InstallLayout> {
        let root = self.install_dir();
        InstallLayout::new(&root, &self.staging_dir)
            .map_err(|e| GuardError::io(format!("resolving {}", root.display()), e))
    }

    /// The upload limit, or `None` when unlimited.
    pub fn upload_limit(&self) -> Option<u64> {
        (self.max_upload_size > 0).then_some(self.max_upload_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_from_empty_document() {
        let settings = GuardSettings::from_yaml("").unwrap();
        assert_eq!(settings, GuardSettings::default());
        assert_eq!(settings.upload_limit(), Some(DEFAULT_MAX_UPLOAD_SIZE));
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let settings = GuardSettings::from_yaml("max_upload_size: 0\nlog_level: debug\n").unwrap();
        assert_eq!(settings.upload_limit(), None);
        assert_eq!(settings.staging_dir, PathBuf::from("tmp"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = GuardSettings::from_yaml("max_upload: 10\n").unwrap_err();
        assert_eq!(err.code(), 1003);
    }

    #[test]
    fn test_staging_dir_must_stay_inside_install() {
        for bad in ["../tmp", "/tmp", "a/../../b", "./tmp"] {
            let yaml = format!("staging_dir: {}\n", bad);
            assert!(GuardSettings::from_yaml(&yaml).is_err(), "accepted {}", bad);
        }
        assert!(GuardSettings::from_yaml("staging_dir: var/staging\n").is_ok());
    }

    #[test]
    fn test_log_level_is_checked() {
        assert!(GuardSettings::from_yaml("log_level: loud\n").is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let settings = GuardSettings {
            install_dir: Some(PathBuf::from("/opt/ossec")),
            max_upload_size: 512,
            ..GuardSettings::default()
        };
        let yaml = settings.to_yaml().unwrap();
        assert_eq!(GuardSettings::from_yaml(&yaml).unwrap(), settings);
    }

    #[test]
    #[serial]
    fn test_env_install_dir_wins() {
        let settings = GuardSettings {
            install_dir: Some(PathBuf::from("/opt/ossec")),
            ..GuardSettings::default()
        };

        std::env::set_var(paths::INSTALL_DIR_ENV, "/srv/manager");
        assert_eq!(settings.install_dir(), PathBuf::from("/srv/manager"));

        std::env::remove_var(paths::INSTALL_DIR_ENV);
        assert_eq!(settings.install_dir(), PathBuf::from("/opt/ossec"));
        assert_eq!(
            GuardSettings::default().install_dir(),
            PathBuf::from("/var/ossec")
        );
    }
}
