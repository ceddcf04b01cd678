//! Stateless format checks for request fields.
//!
//! Every check takes the raw string and answers `true` when the value has
//! the expected shape. Type checking is left to the schema layer; see
//! [`crate::registry::FormatRegistry::check`] for how non-string values are
//! handled.

use std::path::Path;

use guard_common::is_safe_path;

use crate::patterns::*;

pub fn format_alphanumeric(value: &str) -> bool {
    ALPHANUMERIC.is_match(value)
}

pub fn format_alphanumeric_symbols(value: &str) -> bool {
    ALPHANUMERIC_SYMBOLS.is_match(value)
}

pub fn format_base64(value: &str) -> bool {
    BASE64.is_match(value)
}

/// Empty, or a hex digest of MD5/SHA1/SHA224/SHA256/SHA384/SHA512 length.
pub fn format_hash(value: &str) -> bool {
    HASHES.is_match(value)
}

pub fn format_hash_or_empty(value: &str) -> bool {
    value.is_empty() || format_hash(value)
}

pub fn format_names(value: &str) -> bool {
    NAMES.is_match(value)
}

pub fn format_names_or_empty(value: &str) -> bool {
    value.is_empty() || format_names(value)
}

pub fn format_numbers(value: &str) -> bool {
    NUMBERS.is_match(value)
}

pub fn format_numbers_or_empty(value: &str) -> bool {
    value.is_empty() || format_numbers(value)
}

pub fn format_numbers_or_all(value: &str) -> bool {
    NUMBERS_OR_ALL.is_match(value)
}

/// Group names may not be `.`, `..` or the reserved word `all`.
pub fn format_group_names(value: &str) -> bool {
    !matches!(value, "." | ".." | "all") && GROUP_NAME_CHARS.is_match(value)
}

pub fn format_group_names_or_all(value: &str) -> bool {
    !matches!(value, "." | "..") && GROUP_NAME_CHARS.is_match(value)
}

/// Relative path under `base_dir`, restricted to path characters.
pub fn format_path(value: &str, base_dir: &Path) -> bool {
    is_safe_path(value, base_dir, true) && PATHS.is_match(value)
}

/// Absolute path that must still land inside `base_dir`.
pub fn format_wazuh_path(value: &str, base_dir: &Path) -> bool {
    is_safe_path(value, base_dir, false) && PATHS.is_match(value)
}

/// Relative path into one of the rule, decoder or list subtrees.
pub fn format_get_dirnames_path(value: &str, base_dir: &Path) -> bool {
    is_safe_path(value, base_dir, true) && GET_DIRNAMES_PATH.is_match(value)
}

pub fn format_cdb_filename_path(value: &str) -> bool {
    CDB_FILENAME_PATH.is_match(value)
}

pub fn format_xml_filename_path(value: &str) -> bool {
    XML_FILENAME_PATH.is_match(value)
}

pub fn format_xml_filename(value: &str) -> bool {
    XML_FILENAME.is_match(value)
}

pub fn format_query(value: &str) -> bool {
    QUERY.is_match(value)
}

pub fn format_range(value: &str) -> bool {
    RANGES.is_match(value)
}

pub fn format_search(value: &str) -> bool {
    SEARCH.is_match(value)
}

pub fn format_sort(value: &str) -> bool {
    SORT.is_match(value)
}

pub fn format_timeframe(value: &str) -> bool {
    TIMEFRAME.is_match(value)
}

pub fn format_date(value: &str) -> bool {
    ISO8601_DATE.is_match(value)
}

pub fn format_datetime(value: &str) -> bool {
    ISO8601_DATE_TIME.is_match(value)
}

pub fn format_datetime_or_empty(value: &str) -> bool {
    value.is_empty() || format_datetime(value)
}

pub fn format_wazuh_key(value: &str) -> bool {
    WAZUH_KEY.is_match(value)
}

pub fn format_wazuh_version(value: &str) -> bool {
    WAZUH_VERSION.is_match(value)
}

pub fn format_ips(value: &str) -> bool {
    IPS.is_match(value)
}

pub fn format_boolean(value: &str) -> bool {
    BOOLEAN.is_match(value)
}

pub fn format_empty_boolean(value: &str) -> bool {
    EMPTY_BOOLEAN.is_match(value)
}

pub fn format_yes_no_boolean(value: &str) -> bool {
    YES_NO_BOOLEAN.is_match(value)
}

pub fn format_dates(value: &str) -> bool {
    DATES.is_match(value)
}

pub fn format_type(value: &str) -> bool {
    TYPE_FORMAT.is_match(value)
}

pub fn format_numbers_list(value: &str) -> bool {
    ARRAY_NUMBERS.is_match(value)
}

pub fn format_names_list(value: &str) -> bool {
    ARRAY_NAMES.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn hex(len: usize) -> String {
        "0123456789abcdefABCDEF".chars().cycle().take(len).collect()
    }

    #[test]
    fn test_hash_accepts_only_digest_lengths() {
        for len in [32, 40, 56, 64, 96, 128] {
            assert!(format_hash(&hex(len)), "length {}", len);
        }
        for len in [1, 31, 33, 48, 63, 65, 127, 129, 256] {
            assert!(!format_hash(&hex(len)), "length {}", len);
        }
        assert!(format_hash(""));
        assert!(!format_hash(&format!("{}g", hex(31))));
    }

    #[test]
    fn test_wazuh_version() {
        assert!(format_wazuh_version("wazuh v4.3.0"));
        assert!(format_wazuh_version("4.3.0"));
        assert!(format_wazuh_version("V4.3.0"));
        assert!(format_wazuh_version("WAZUH 4.3.10"));
        assert!(!format_wazuh_version("4.3"));
        assert!(!format_wazuh_version("wazuhv4.3.0"));
        assert!(!format_wazuh_version("4.3.0-rc1"));
    }

    #[test]
    fn test_group_names() {
        assert!(format_group_names("default"));
        assert!(format_group_names("web-servers.eu_1"));
        assert!(format_group_names("..."));
        assert!(!format_group_names("."));
        assert!(!format_group_names(".."));
        assert!(!format_group_names("all"));
        assert!(!format_group_names("a b"));
        assert!(format_group_names_or_all("all"));
        assert!(!format_group_names_or_all(".."));
    }

    #[test]
    fn test_alphanumeric_families() {
        assert!(format_alphanumeric("Linux agent, v4.2: ok+1"));
        assert!(!format_alphanumeric("rm -rf /"));
        assert!(format_alphanumeric_symbols("<rule id=\"100001\"> (a|b) ~#"));
        assert!(!format_alphanumeric_symbols("$(whoami)"));
        assert!(!format_alphanumeric(""));
    }

    #[test]
    fn test_base64_padding() {
        assert!(format_base64("aGVsbG8="));
        assert!(format_base64("aGVsbG8gd29ybGQ="));
        assert!(format_base64("aGk="));
        assert!(!format_base64("aGVsbG8"));
        assert!(!format_base64("aGVsbG8=="));
    }

    #[test]
    fn test_or_empty_variants() {
        assert!(format_names_or_empty(""));
        assert!(format_numbers_or_empty(""));
        assert!(format_hash_or_empty(""));
        assert!(format_datetime_or_empty(""));
        assert!(!format_names(""));
        assert!(!format_numbers(""));
        assert!(!format_datetime(""));
        assert!(!format_numbers_or_empty("12a"));
    }

    #[test]
    fn test_numbers() {
        assert!(format_numbers("001"));
        assert!(!format_numbers("-1"));
        assert!(format_numbers_or_all("all"));
        assert!(format_numbers_or_all("15"));
        assert!(!format_numbers_or_all("ALL"));
        assert!(format_numbers_list("1,2,30"));
        assert!(!format_numbers_list("1,,2"));
    }

    #[test]
    fn test_filenames() {
        assert!(format_cdb_filename_path("audit-keys"));
        assert!(!format_cdb_filename_path("audit-keys.cdb"));
        assert!(format_xml_filename_path("local_rules.xml"));
        assert!(!format_xml_filename_path("local_rules"));
        assert!(!format_xml_filename_path("etc/local_rules.xml"));
        assert!(format_xml_filename("a.xml,b-c.xml"));
        assert!(!format_xml_filename("a.xml,"));
    }

    #[test]
    fn test_query() {
        assert!(format_query("status=active"));
        assert!(format_query("os.platform!=windows;version<4.2,name~web server"));
        assert!(!format_query("status"));
        assert!(!format_query("status==active"));
        assert!(!format_query("status=active;"));
    }

    #[test]
    fn test_range() {
        assert!(format_range("10"));
        assert!(format_range("123456"));
        assert!(format_range("1-99"));
        assert!(!format_range("100-200"));
        assert!(!format_range("1-"));
    }

    #[test]
    fn test_search_sort_timeframe() {
        assert!(format_search("failed login from 10.0.0.1"));
        assert!(!format_search("a;b"));
        assert!(!format_search("a|b"));
        assert!(!format_search(""));
        assert!(format_sort("+name,-id"));
        assert!(!format_sort("name;drop"));
        assert!(format_timeframe("7d"));
        assert!(format_timeframe("3600"));
        assert!(!format_timeframe("1w"));
        assert!(!format_timeframe("d"));
    }

    #[test]
    fn test_dates() {
        assert!(format_date("2022-02-28"));
        assert!(!format_date("2022-13-01"));
        assert!(!format_date("2022-02-32"));
        assert!(format_datetime("2022-02-28T13:45:00Z"));
        assert!(format_datetime("2022-02-28t13:45:00.123+05:30"));
        assert!(!format_datetime("2022-02-28T13:45:00"));
        assert!(!format_datetime("2022-02-28 13:45:00Z"));
        assert!(format_dates("20220228"));
    }

    #[test]
    fn test_wazuh_key() {
        assert!(format_wazuh_key("MDAxIGFnZW50"));
        assert!(!format_wazuh_key("abc=="));
    }

    #[test]
    fn test_supplementary_formats() {
        assert!(format_ips("192.168.1.0/24"));
        assert!(format_ips("any"));
        assert!(!format_ips("256.1.1.1"));
        assert!(format_boolean("true"));
        assert!(!format_boolean("True"));
        assert!(format_empty_boolean(""));
        assert!(format_yes_no_boolean("no"));
        assert!(format_type("json"));
        assert!(!format_type("yaml"));
        assert!(format_names_list("agent-1,agent_2"));
    }

    #[test]
    fn test_path_formats() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("etc/rules")).unwrap();

        assert!(format_path("etc/rules/local_rules.xml", base));
        assert!(!format_path("etc/rules/local rules.xml", base));
        assert!(!format_path("../etc/passwd", base));

        let absolute = base.join("etc/rules");
        assert!(format_wazuh_path(absolute.to_str().unwrap(), base));
        assert!(!format_wazuh_path("/etc/passwd", base));

        assert!(format_get_dirnames_path("etc/rules", base));
        assert!(format_get_dirnames_path("ruleset/decoders/custom", base));
        assert!(format_get_dirnames_path("etc/lists/amazon", base));
        assert!(!format_get_dirnames_path("etc/shared", base));
        assert!(!format_get_dirnames_path("ruleset/lists", base));
    }
}
