use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse failure category, stable across error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPath,
    MalformedContent,
    IoFailure,
    ValidationRejected,
    PayloadTooLarge,
    UnknownFormat,
    DuplicateFormat,
    Config,
}

/// Error codes surfaced at the API boundary.
pub mod codes {
    pub const VALIDATION_REJECTED: u16 = 1000;
    pub const UNKNOWN_FORMAT: u16 = 1001;
    pub const DUPLICATE_FORMAT: u16 = 1002;
    pub const CONFIG: u16 = 1003;
    pub const PAYLOAD_TOO_LARGE: u16 = 1004;
    pub const FILE_IO: u16 = 1005;
    pub const MOVE_FAILED: u16 = 1016;
    pub const XML_SYNTAX: u16 = 1113;
    pub const INVALID_CDB_LIST: u16 = 1802;
    pub const INVALID_PATH: u16 = 1907;
}

#[derive(Error, Debug)]
pub enum GuardError {
    InvalidPath(String),
    MalformedXml(String),
    MalformedList(String),
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    Commit {
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
    ValidationRejected(Vec<String>),
    PayloadTooLarge {
        size: u64,
        limit: u64,
    },
    UnknownFormat(String),
    DuplicateFormat(String),
    Config(String),
}

impl GuardError {
    /// Wrap a low-level I/O error with the operation that raised it.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        GuardError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GuardError::InvalidPath(_) => ErrorKind::InvalidPath,
            GuardError::MalformedXml(_) | GuardError::MalformedList(_) => {
                ErrorKind::MalformedContent
            }
            GuardError::Io { .. } | GuardError::Commit { .. } => ErrorKind::IoFailure,
            GuardError::ValidationRejected(_) => ErrorKind::ValidationRejected,
            GuardError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            GuardError::UnknownFormat(_) => ErrorKind::UnknownFormat,
            GuardError::DuplicateFormat(_) => ErrorKind::DuplicateFormat,
            GuardError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            GuardError::InvalidPath(_) => codes::INVALID_PATH,
            GuardError::MalformedXml(_) => codes::XML_SYNTAX,
            GuardError::MalformedList(_) => codes::INVALID_CDB_LIST,
            GuardError::Io { .. } => codes::FILE_IO,
            GuardError::Commit { .. } => codes::MOVE_FAILED,
            GuardError::ValidationRejected(_) => codes::VALIDATION_REJECTED,
            GuardError::PayloadTooLarge { .. } => codes::PAYLOAD_TOO_LARGE,
            GuardError::UnknownFormat(_) => codes::UNKNOWN_FORMAT,
            GuardError::DuplicateFormat(_) => codes::DUPLICATE_FORMAT,
            GuardError::Config(_) => codes::CONFIG,
        }
    }
}

impl Display for GuardError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            GuardError::InvalidPath(s) => write!(f, "Invalid path: {}", s),
            GuardError::MalformedXml(s) => write!(f, "Wrong XML syntax: {}", s),
            GuardError::MalformedList(s) => write!(f, "Invalid CDB list content: {}", s),
            GuardError::Io { context, source } => {
                write!(f, "Error accessing file ({}): {}", context, source)
            }
            GuardError::Commit {
                destination,
                source,
            } => write!(
                f,
                "Error moving staged file to {}: {}",
                destination.display(),
                source
            ),
            GuardError::ValidationRejected(violations) => {
                write!(f, "Request rejected by schema")?;
                for violation in violations {
                    write!(f, "\n  • {}", violation)?;
                }
                Ok(())
            }
            GuardError::PayloadTooLarge { size, limit } => write!(
                f,
                "Payload of {} bytes exceeds the maximum upload size of {} bytes",
                size, limit
            ),
            GuardError::UnknownFormat(s) => write!(f, "Unknown format: {}", s),
            GuardError::DuplicateFormat(s) => write!(f, "Format already registered: {}", s),
            GuardError::Config(s) => write!(f, "Configuration error: {}", s),
        }
    }
}

impl From<serde_yaml_ng::Error> for GuardError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        GuardError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        GuardError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
