//! Foundation types for Resource Guard.
//!
//! Holds the error taxonomy shared by every crate, the filesystem primitives
//! the path guard and the upload pipeline are built on, and the CLI output
//! macros.

pub mod error;
pub mod output_macros;
pub mod platform;
pub mod temp_dir;

pub use error::{ErrorKind, GuardError, Result};
