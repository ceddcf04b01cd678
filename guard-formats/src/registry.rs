//! Registry binding format names to their checks.
//!
//! The registry is an explicit value: build it once at startup with
//! [`FormatRegistry::with_defaults`], add custom formats with
//! [`FormatRegistry::register`], then hand it by reference to whatever
//! validates request documents. Nothing is registered implicitly.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use guard_core::error::{GuardError, Result};
use serde_json::Value;
use tracing::debug;

use crate::validators as v;

/// A named format check.
pub type FormatFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Immutable-after-build map from format name to check.
#[derive(Clone, Default)]
pub struct FormatRegistry {
    formats: BTreeMap<String, FormatFn>,
}

/// Bind plain `fn(&str) -> bool` checks.
macro_rules! bind_plain {
    ($registry:expr, $($name:literal => $check:path),+ $(,)?) => {
        $(
            $registry.bind($name, Arc::new($check));
        )+
    };
}

/// Bind checks that need the installation directory.
macro_rules! bind_rooted {
    ($registry:expr, $base:expr, $($name:literal => $check:path),+ $(,)?) => {
        $(
            {
                let base: PathBuf = $base.to_path_buf();
                $registry.bind($name, Arc::new(move |value: &str| $check(value, &base)));
            }
        )+
    };
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in format, with path formats confined
    /// to `base_dir`.
    pub fn with_defaults(base_dir: &Path) -> Self {
        let mut registry = Self::new();

        bind_plain!(registry,
            "alphanumeric" => v::format_alphanumeric,
            "alphanumeric_symbols" => v::format_alphanumeric_symbols,
            "base64" => v::format_base64,
            "hash" => v::format_hash,
            "hash_or_empty" => v::format_hash_or_empty,
            "names" => v::format_names,
            "names_or_empty" => v::format_names_or_empty,
            "numbers" => v::format_numbers,
            "numbers_or_empty" => v::format_numbers_or_empty,
            "numbers_or_all" => v::format_numbers_or_all,
            "group_names" => v::format_group_names,
            "group_names_or_all" => v::format_group_names_or_all,
            "cdb_filename_path" => v::format_cdb_filename_path,
            "xml_filename_path" => v::format_xml_filename_path,
            "xml_filename" => v::format_xml_filename,
            "query" => v::format_query,
            "range" => v::format_range,
            "search" => v::format_search,
            "sort" => v::format_sort,
            "timeframe" => v::format_timeframe,
            "date" => v::format_date,
            "date-time" => v::format_datetime,
            "date-time_or_empty" => v::format_datetime_or_empty,
            "wazuh_key" => v::format_wazuh_key,
            "wazuh_version" => v::format_wazuh_version,
            "ips" => v::format_ips,
            "boolean" => v::format_boolean,
            "empty_boolean" => v::format_empty_boolean,
            "yes_no_boolean" => v::format_yes_no_boolean,
            "dates" => v::format_dates,
            "type_format" => v::format_type,
            "numbers_list" => v::format_numbers_list,
            "names_list" => v::format_names_list,
        );

        bind_rooted!(registry, base_dir,
            "path" => v::format_path,
            "wazuh_path" => v::format_wazuh_path,
            "get_dirnames_path" => v::format_get_dirnames_path,
        );

        registry
    }

    fn bind(&mut self, name: &str, check: FormatFn) {
        self.formats.insert(name.to_string(), check);
    }

    /// Register a custom format. A name can only ever be bound once.
    pub fn register<F>(&mut self, name: impl Into<String>, check: F) -> Result<()>
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        if self.formats.contains_key(&name) {
            return Err(GuardError::DuplicateFormat(name));
        }
        self.formats.insert(name, Arc::new(check));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FormatFn> {
        self.formats.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormatFn)> {
        self.formats.iter().map(|(name, check)| (name.as_str(), check))
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Check a string against the named format.
    pub fn check_str(&self, name: &str, value: &str) -> Result<bool> {
        let check = self
            .get(name)
            .ok_or_else(|| GuardError::UnknownFormat(name.to_string()))?;
        let valid = check(value);
        if !valid {
            debug!(format = name, value, "value rejected by format");
        }
        Ok(valid)
    }

    /// Check a JSON value against the named format.
    ///
    /// Formats only constrain the shape of strings; any other JSON type is
    /// accepted here and left to the schema's `type` keyword.
    pub fn check(&self, name: &str, value: &Value) -> Result<bool> {
        match value {
            Value::String(s) => self.check_str(name, s),
            _ if self.contains(name) => Ok(true),
            _ => Err(GuardError::UnknownFormat(name.to_string())),
        }
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .finish()
    }
}
