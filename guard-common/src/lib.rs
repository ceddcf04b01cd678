//! Common utilities for Resource Guard
//!
//! This crate provides the path-confinement guard used by both request
//! validation and uploads, file reading helpers, and tracing setup. It sits
//! directly on top of `guard-core`.

pub mod security;
pub mod tracing_init;

// Re-export from guard-core for convenience
pub use guard_core::output_macros;
pub use guard_core::platform;
pub use guard_core::temp_dir;
pub use guard_core::{
    guard_error, guard_error_with_details, guard_println, guard_success, guard_warning,
};

pub use security::{confine, is_safe_path};

// Standard library
use std::io::Read;
use std::path::Path;

// External crates
use guard_core::error::{GuardError, Result};

/// File operations utilities
pub struct FileOps;

impl FileOps {
    /// Read file contents, mapping failures to an I/O error that names the file
    #[must_use = "file read results should be used"]
    pub fn read_file_with_context(path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .map_err(|e| GuardError::io(format!("reading {}", path.display()), e))
    }

    /// Read raw file bytes, mapping failures like [`Self::read_file_with_context`]
    #[must_use = "file read results should be used"]
    pub fn read_bytes_with_context(path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| GuardError::io(format!("reading {}", path.display()), e))
    }

    /// Read from file or stdin if path is "-"
    #[must_use = "file or stdin read results should be used"]
    pub fn read_file_or_stdin(path: &Path) -> Result<String> {
        if path.to_str() == Some("-") {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| GuardError::io("reading stdin", e))?;
            Ok(buffer)
        } else {
            Self::read_file_with_context(path)
        }
    }
}
