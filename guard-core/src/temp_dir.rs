use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use tempfile::TempPath;
use tracing::debug;

/// Prefix shared by every staged upload.
pub const STAGING_PREFIX: &str = "api_tmp_file";

const MAX_NAME_ATTEMPTS: u32 = 16;

/// Build a staging file name from the wall clock and a random integer.
///
/// Uniqueness is what matters here, not unpredictability: the staging
/// directory is privileged.
pub fn staging_file_name(extension: &str) -> String {
    let now = Utc::now();
    let salt: u32 = rand::rng().random_range(0..=1000);
    format!(
        "{}_{}.{:06}_{}.{}",
        STAGING_PREFIX,
        now.timestamp(),
        now.timestamp_subsec_micros(),
        salt,
        extension
    )
}

/// Exclusively create a fresh staging file inside `dir`.
///
/// The returned [`TempPath`] deletes the file when dropped, so a staging
/// file can never outlive the operation that created it unless it is
/// explicitly persisted.
pub fn create_staging_file(dir: &Path, extension: &str) -> io::Result<(File, TempPath)> {
    let mut last_err = None;
    for _ in 0..MAX_NAME_ATTEMPTS {
        let candidate: PathBuf = dir.join(staging_file_name(extension));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((file, TempPath::from_path(candidate))),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(candidate = %candidate.display(), "staging name taken, retrying");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::from(ErrorKind::AlreadyExists)))
}
