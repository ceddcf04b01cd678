//! A staged upload on its way to the managed tree.
//!
//! A [`StagingTicket`] owns one uniquely named file in the staging
//! directory. The file either ends up at the ticket's target through
//! [`StagingTicket::commit`] or is removed when the ticket is dropped.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use guard_core::error::{GuardError, Result};
use guard_core::platform::set_mode;
use guard_core::temp_dir::create_staging_file;
use tempfile::TempPath;
use tracing::{debug, info, warn};

use crate::content::read_text;
use crate::kind::ResourceKind;

#[derive(Debug)]
pub struct StagingTicket {
    staged: Option<TempPath>,
    target: PathBuf,
    kind: ResourceKind,
    bytes: u64,
}

impl StagingTicket {
    /// Write `content` verbatim into a fresh staging file with the kind's
    /// staging permissions.
    pub fn stage(
        staging_dir: &Path,
        target: PathBuf,
        kind: ResourceKind,
        content: &str,
    ) -> Result<Self> {
        let (mut file, staged) = create_staging_file(staging_dir, kind.extension())
            .map_err(|e| {
                GuardError::io(format!("creating staging file in {}", staging_dir.display()), e)
            })?;

        // From here on `staged` removes the file on every early return.
        file.write_all(content.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| GuardError::io(format!("writing {}", staged.display()), e))?;
        drop(file);

        set_mode(&staged, kind.staged_mode())
            .map_err(|e| GuardError::io(format!("setting mode on {}", staged.display()), e))?;

        debug!(staged = %staged.display(), target = %target.display(), %kind, "upload staged");
        Ok(Self {
            staged: Some(staged),
            target,
            kind,
            bytes: content.len() as u64,
        })
    }

    pub fn staged_path(&self) -> Option<&Path> {
        self.staged.as_deref()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Re-read the staged file and check it as its kind.
    pub fn validate(&self) -> Result<()> {
        let staged = self.staged_path().ok_or_else(|| {
            GuardError::io("validating staged file", io::Error::from(io::ErrorKind::NotFound))
        })?;
        match read_text(staged)? {
            Some(content) => self.kind.check(&content),
            None => Err(self.kind.malformed("content is not valid UTF-8".to_string())),
        }
    }

    /// Move the staged file onto the target with final permissions.
    ///
    /// A failed rename (typically across filesystems) falls back to copying
    /// into a hidden file beside the target and renaming that.
    pub fn commit(mut self) -> Result<PathBuf> {
        let staged = self.staged.take().ok_or_else(|| GuardError::Commit {
            destination: self.target.clone(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })?;
        let mode = self.kind.final_mode();
        let commit_error = |source: io::Error| GuardError::Commit {
            destination: self.target.clone(),
            source,
        };

        if let Err(source) = set_mode(&staged, mode) {
            discard(staged);
            return Err(commit_error(source));
        }

        match staged.persist(&self.target) {
            Ok(()) => {}
            Err(failed) => {
                debug!(error = %failed.error, "rename failed, copying into place");
                let copied = copy_into_place(&failed.path, &self.target, mode);
                discard(failed.path);
                copied.map_err(commit_error)?;
            }
        }

        info!(destination = %self.target.display(), kind = %self.kind, bytes = self.bytes, "upload committed");
        Ok(self.target.clone())
    }
}

impl Drop for StagingTicket {
    fn drop(&mut self) {
        if let Some(staged) = self.staged.take() {
            discard(staged);
        }
    }
}

/// Remove a staging file, logging instead of failing.
fn discard(staged: TempPath) {
    let path = staged.to_path_buf();
    if let Err(e) = staged.close() {
        warn!(path = %path.display(), error = %e, "failed to remove staging file");
    }
}

fn copy_into_place(staged: &Path, target: &Path, mode: u32) -> io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut sibling = tempfile::Builder::new()
        .prefix(".api_tmp_file")
        .tempfile_in(dir)?;
    let mut source = File::open(staged)?;
    io::copy(&mut source, sibling.as_file_mut())?;
    sibling.as_file().sync_all()?;
    set_mode(sibling.path(), mode)?;
    sibling.persist(target).map_err(|e| e.error)?;
    Ok(())
}
