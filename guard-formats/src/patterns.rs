//! Compiled patterns behind the named formats.
//!
//! Each pattern is compiled once, on first use, and shared read-only.

use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub static $name: Lazy<Regex> =
            Lazy::new(|| Regex::new($re).expect(concat!("invalid pattern ", stringify!($name))));
    };
}

pattern!(ALPHANUMERIC, r"^[\w,\-.+\s:]+$");
pattern!(ALPHANUMERIC_SYMBOLS, r#"^[\w,<>!\-.+\s:/()\[\]'"|=~#]+$"#);
pattern!(ARRAY_NUMBERS, r"^\d+(,\d+)*$");
pattern!(ARRAY_NAMES, r"^[\w\-.%]+(,[\w\-.%]+)*$");
pattern!(
    BASE64,
    r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$"
);
pattern!(BOOLEAN, r"^(?:true|false)$");
pattern!(DATES, r"^\d{8}$");
pattern!(EMPTY_BOOLEAN, r"^(?:|true|false)$");
pattern!(GROUP_NAME_CHARS, r"^[\w.\-]+$");
pattern!(
    HASHES,
    r"^(?:[0-9a-fA-F]{32}|[0-9a-fA-F]{40}|[0-9a-fA-F]{56}|[0-9a-fA-F]{64}|[0-9a-fA-F]{96}|[0-9a-fA-F]{128})?$"
);
pattern!(
    IPS,
    r"^(?:(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(?:/(?:[0-9]|[1-2][0-9]|3[0-2]))?|any|ANY)$"
);
pattern!(
    ISO8601_DATE,
    r"^([0-9]{4})-(1[0-2]|0[1-9])-(3[01]|0[1-9]|[12][0-9])$"
);
pattern!(
    ISO8601_DATE_TIME,
    r"^([0-9]{4})-(1[0-2]|0[1-9])-(3[01]|0[1-9]|[12][0-9])[tT](2[0-3]|[01][0-9]):([0-5][0-9]):([0-5][0-9])(\.[0-9]+)?([zZ]|[+-](?:2[0-3]|[01][0-9]):[0-5][0-9])$"
);
pattern!(NAMES, r"^[\w\-.%]+$");
pattern!(NUMBERS, r"^\d+$");
pattern!(NUMBERS_OR_ALL, r"^(\d+|all)$");
pattern!(WAZUH_KEY, r"^[a-zA-Z0-9]+$");
pattern!(WAZUH_VERSION, r"(?i)^(?:wazuh )?v?\d+\.\d+\.\d+$");
pattern!(PATHS, r"^[\w\-.\\/:]+$");
pattern!(CDB_FILENAME_PATH, r"^[\-\w]+$");
pattern!(XML_FILENAME_PATH, r"^[\w\-]+\.xml$");
pattern!(XML_FILENAME, r"^[\w\-]+\.xml(,[\w\-]+\.xml)*$");
pattern!(
    QUERY,
    r"^[\w.\-]+(?:=|!=|<|>|~)[\w.\- ]+(?:[;,][\w.\-]+(?:=|!=|<|>|~)[\w.\- ]+)*$"
);
pattern!(RANGES, r"^(?:\d+|\d{1,2}-\d{1,2})$");
pattern!(
    GET_DIRNAMES_PATH,
    r"^(((etc|ruleset)/(decoders|rules)[\w\-/]*)|(etc/lists[\w\-/]*))$"
);
pattern!(SEARCH, r"^[^;|&^*>]+$");
pattern!(SORT, r"^[\w_\-,\s+.]+$");
pattern!(TIMEFRAME, r"^(\d+[dhms]?)$");
pattern!(TYPE_FORMAT, r"^(?:xml|json)$");
pattern!(YES_NO_BOOLEAN, r"^(?:yes|no)$");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_compiles() {
        let all: [&Lazy<Regex>; 30] = [
            &ALPHANUMERIC,
            &ALPHANUMERIC_SYMBOLS,
            &ARRAY_NUMBERS,
            &ARRAY_NAMES,
            &BASE64,
            &BOOLEAN,
            &DATES,
            &EMPTY_BOOLEAN,
            &GROUP_NAME_CHARS,
            &HASHES,
            &IPS,
            &ISO8601_DATE,
            &ISO8601_DATE_TIME,
            &NAMES,
            &NUMBERS,
            &NUMBERS_OR_ALL,
            &WAZUH_KEY,
            &WAZUH_VERSION,
            &PATHS,
            &CDB_FILENAME_PATH,
            &XML_FILENAME_PATH,
            &XML_FILENAME,
            &QUERY,
            &RANGES,
            &GET_DIRNAMES_PATH,
            &SEARCH,
            &SORT,
            &TIMEFRAME,
            &TYPE_FORMAT,
            &YES_NO_BOOLEAN,
        ];
        for pattern in all {
            Lazy::force(pattern);
        }
    }
}
