//! Request document validation against a JSON schema.
//!
//! [`RequestValidator`] compiles a Draft 4 schema with the `jsonschema`
//! crate and binds every entry of a [`FormatRegistry`] as a custom format,
//! so a field declaring `"format": "numbers"` is checked by the registry's
//! `numbers` check wherever it appears, `$ref` targets included. A `format`
//! the registry does not know is refused when the validator is built
//! instead of being skipped at request time.

use std::fmt;
use std::sync::Arc;

use guard_core::error::{GuardError, Result};
use jsonschema::{Draft, Validator};
use serde_json::{Map, Value};
use tracing::debug;

use crate::registry::FormatRegistry;

/// Keywords whose value is a single subschema.
const SINGLE_SUBSCHEMA: [&str; 4] = ["items", "additionalItems", "additionalProperties", "not"];
/// Keywords whose value is a list of subschemas.
const SUBSCHEMA_LISTS: [&str; 4] = ["items", "allOf", "anyOf", "oneOf"];
/// Keywords whose value maps names to subschemas.
const SUBSCHEMA_MAPS: [&str; 4] = ["properties", "patternProperties", "definitions", "dependencies"];

/// One reason a document was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value (`""` for the document root).
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_empty() {
            "/"
        } else {
            &self.pointer
        };
        write!(f, "{}: {}", pointer, self.message)
    }
}

/// A compiled request schema with the registry's formats bound in.
#[derive(Debug)]
pub struct RequestValidator {
    validator: Validator,
}

impl RequestValidator {
    pub fn new(registry: &FormatRegistry, schema: Value) -> Result<Self> {
        let mut declared = Vec::new();
        declared_formats(&schema, &mut declared);
        if let Some(unknown) = declared.into_iter().find(|name| !registry.contains(name)) {
            return Err(GuardError::UnknownFormat(unknown.to_string()));
        }

        let mut options = jsonschema::options()
            .with_draft(Draft::Draft4)
            .should_validate_formats(true)
            .should_ignore_unknown_formats(false);
        for (name, check) in registry.iter() {
            let check = Arc::clone(check);
            options = options.with_format(name, move |value: &str| check(value));
        }

        let validator = options
            .build(&schema)
            .map_err(|e| GuardError::Config(format!("invalid request schema: {}", e)))?;
        Ok(Self { validator })
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Every violation in `instance`.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|error| Violation {
                pointer: error.instance_path.as_str().to_string(),
                message: error.to_string(),
            })
            .collect()
    }

    /// Accept `instance` or reject it with every violation found.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        let violations = self.violations(instance);
        if violations.is_empty() {
            return Ok(());
        }
        debug!(count = violations.len(), "request rejected by schema");
        Err(GuardError::ValidationRejected(
            violations.iter().map(ToString::to_string).collect(),
        ))
    }
}

/// Collect the `format` names a schema declares, descending only into
/// subschema positions so data under `enum` or `default` is not mistaken
/// for a keyword.
fn declared_formats<'s>(schema: &'s Value, out: &mut Vec<&'s str>) {
    let keywords: &Map<String, Value> = match schema {
        Value::Object(keywords) => keywords,
        _ => return,
    };

    if let Some(Value::String(format)) = keywords.get("format") {
        out.push(format);
    }

    for keyword in SINGLE_SUBSCHEMA {
        if let Some(subschema @ Value::Object(_)) = keywords.get(keyword) {
            declared_formats(subschema, out);
        }
    }

    for keyword in SUBSCHEMA_LISTS {
        if let Some(Value::Array(list)) = keywords.get(keyword) {
            for subschema in list {
                declared_formats(subschema, out);
            }
        }
    }

    for keyword in SUBSCHEMA_MAPS {
        if let Some(Value::Object(map)) = keywords.get(keyword) {
            for subschema in map.values() {
                declared_formats(subschema, out);
            }
        }
    }
}
