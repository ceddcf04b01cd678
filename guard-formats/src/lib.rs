//! Named string formats and request schema validation.
//!
//! ## Main Features
//! - Pattern-backed checks for every request field format
//! - An explicit [`FormatRegistry`] mapping format names to checks
//! - [`RequestValidator`], which applies a JSON schema and resolves its
//!   `format` keywords through a registry

pub mod patterns;
pub mod registry;
pub mod schema;
pub mod validators;

pub use registry::{FormatFn, FormatRegistry};
pub use schema::{RequestValidator, Violation};
