//! Staged uploads into the managed tree.
//!
//! An upload is confined, size-checked and syntax-checked, then written to
//! a staging file, checked again as it sits on disk, and finally renamed
//! onto its destination. Whatever fails along the way, the staging file is
//! removed and the destination is left untouched.

use std::fs;
use std::path::{Path, PathBuf};

use guard_common::confine;
use guard_config::{GuardSettings, InstallLayout};
use guard_core::error::{GuardError, Result};
use tracing::{debug, info_span};

use crate::content::{validate_cdb_list_file, validate_xml_document_file, validate_xml_file};
use crate::kind::ResourceKind;
use crate::ticket::StagingTicket;

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub destination: PathBuf,
    pub kind: ResourceKind,
    pub bytes: u64,
}

/// Uploads and validates resources of one installation.
#[derive(Debug, Clone)]
pub struct ResourceManager {
    layout: InstallLayout,
    max_upload_size: Option<u64>,
}

impl ResourceManager {
    /// A manager without an upload size limit.
    pub fn new(layout: InstallLayout) -> Self {
        Self {
            layout,
            max_upload_size: None,
        }
    }

    pub fn from_settings(settings: &GuardSettings) -> Result<Self> {
        Ok(Self::new(settings.layout()?).with_upload_limit(settings.upload_limit()))
    }

    pub fn with_upload_limit(mut self, limit: Option<u64>) -> Self {
        self.max_upload_size = limit;
        self
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Create the staging directory if it does not exist yet.
    pub fn ensure_dirs(&self) -> Result<()> {
        let staging = self.layout.staging_dir();
        fs::create_dir_all(staging)
            .map_err(|e| GuardError::io(format!("creating {}", staging.display()), e))
    }

    /// Upload a rule or decoder file to `destination`, relative to the
    /// installation directory.
    pub fn upload_xml(&self, content: &str, destination: &str) -> Result<UploadOutcome> {
        self.upload(ResourceKind::Xml, content, destination)
    }

    /// Upload a CDB list to `destination`, relative to the installation
    /// directory.
    pub fn upload_list(&self, content: &str, destination: &str) -> Result<UploadOutcome> {
        self.upload(ResourceKind::CdbList, content, destination)
    }

    pub fn upload(
        &self,
        kind: ResourceKind,
        content: &str,
        destination: &str,
    ) -> Result<UploadOutcome> {
        let _span = info_span!("upload", %kind, destination).entered();

        let target = self.resolve(destination)?;
        self.check_size(content.len() as u64)?;

        let prepared = kind.prepare(content);
        kind.check(&prepared)?;

        self.ensure_dirs()?;
        let ticket = StagingTicket::stage(self.layout.staging_dir(), target, kind, &prepared)?;
        ticket.validate()?;

        let bytes = ticket.bytes();
        let destination = ticket.commit()?;
        Ok(UploadOutcome {
            destination,
            kind,
            bytes,
        })
    }

    /// Check a rule/decoder file under the installation directory.
    ///
    /// `Ok(false)` means malformed; unreadable files are an error.
    pub fn validate_xml(&self, path: &str) -> Result<bool> {
        validate_xml_file(&self.resolve(path)?)
    }

    /// Check a single-root XML document, such as `etc/ossec.conf`, under the
    /// installation directory.
    pub fn validate_xml_document(&self, path: &str) -> Result<bool> {
        validate_xml_document_file(&self.resolve(path)?)
    }

    /// Check a CDB list under the installation directory.
    ///
    /// `Ok(false)` means malformed; unreadable files are an error.
    pub fn validate_cdb_list(&self, path: &str) -> Result<bool> {
        validate_cdb_list_file(&self.resolve(path)?)
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        confine(path, self.layout.root(), true)
    }

    fn check_size(&self, size: u64) -> Result<()> {
        match self.max_upload_size {
            Some(limit) if size > limit => {
                debug!(size, limit, "upload too large");
                Err(GuardError::PayloadTooLarge { size, limit })
            }
            _ => Ok(()),
        }
    }

    /// Root of the managed tree.
    pub fn install_dir(&self) -> &Path {
        self.layout.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (TempDir, ResourceManager) {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("etc/lists")).unwrap();
        let layout = InstallLayout::new(temp.path(), Path::new("tmp")).unwrap();
        (temp, ResourceManager::new(layout))
    }

    #[test]
    fn test_size_limit_is_checked_before_staging() {
        let (_temp, manager) = manager();
        let manager = manager.with_upload_limit(Some(4));

        let err = manager.upload_list("key:value\n", "etc/lists/keys").unwrap_err();
        assert_eq!(err.code(), 1004);
        assert!(!manager.layout().staging_dir().exists());
    }

    #[test]
    fn test_destination_outside_install_dir() {
        let (_temp, manager) = manager();
        let err = manager.upload_list("a:b", "../escape").unwrap_err();
        assert_eq!(err.code(), 1907);
    }

    #[test]
    fn test_list_is_normalized_on_upload() {
        let (_temp, manager) = manager();
        let outcome = manager.upload_list("  a:1\n\nb:2", "etc/lists/keys").unwrap();
        assert_eq!(outcome.bytes, 8);
        assert_eq!(fs::read_to_string(&outcome.destination).unwrap(), "a:1\nb:2\n");
    }
}
