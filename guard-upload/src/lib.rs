//! Content validation and staged uploads for Resource Guard.
//!
//! [`ResourceManager`] is the entry point: it confines the destination,
//! checks the content, stages it, checks it again on disk and commits it by
//! rename. [`content`] exposes the syntax checks on their own.

pub mod content;
pub mod kind;
pub mod pipeline;
pub mod ticket;

pub use content::{check_cdb_list, check_xml, check_xml_fragment};
pub use kind::ResourceKind;
pub use pipeline::{ResourceManager, UploadOutcome};
pub use ticket::StagingTicket;
