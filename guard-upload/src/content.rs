//! Syntax checks for uploaded resource content.
//!
//! XML is read with `quick-xml`, which never expands entities or fetches
//! external DTDs, so a hostile document cannot make the check itself do
//! anything beyond reading bytes. Only well-formedness is checked, never
//! what the rules or decoders mean.

use std::path::Path;

use guard_common::FileOps;
use guard_core::error::Result;
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;
use tracing::debug;

/// `key:value`, with either side optionally double-quoted.
static CDB_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:"[\w\-: ]+"|[^:"\s]+):(?:"[\w\-: ]*"|[^:"]*)$"#)
        .expect("invalid CDB line pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum XmlMode {
    /// One root element; a DOCTYPE without entity declarations is allowed.
    Document,
    /// Any number of top-level elements, as in rule and decoder files.
    Fragment,
}

/// Well-formed single-root XML document.
pub fn check_xml(content: &str) -> bool {
    xml_error(content, XmlMode::Document).is_none()
}

/// Well-formed rule/decoder file: a sequence of top-level elements.
pub fn check_xml_fragment(content: &str) -> bool {
    xml_fragment_error(content).is_none()
}

/// First syntax problem in a rule/decoder file, if any.
pub fn xml_fragment_error(content: &str) -> Option<String> {
    xml_error(content, XmlMode::Fragment)
}

fn xml_error(content: &str, mode: XmlMode) -> Option<String> {
    let result = scan_xml(content, mode);
    if let Err(ref detail) = result {
        debug!(?mode, %detail, "xml rejected");
    }
    result.err()
}

fn scan_xml(content: &str, mode: XmlMode) -> std::result::Result<(), String> {
    let mut reader = Reader::from_str(content);
    reader.check_end_names(true).check_comments(true);

    let mut depth = 0usize;
    let mut roots = 0usize;
    let mut seen_any = false;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| format!("{} at byte {}", e, position))?;

        match event {
            Event::Decl(_) if seen_any => {
                return Err(format!("XML declaration not at start, byte {}", position));
            }
            Event::Decl(_) => {}
            Event::DocType(_) if mode == XmlMode::Fragment => {
                return Err("DOCTYPE is not allowed in rule or decoder files".to_string());
            }
            Event::DocType(doctype) => {
                if roots > 0 {
                    return Err("DOCTYPE after the root element".to_string());
                }
                if String::from_utf8_lossy(&doctype).contains("<!ENTITY") {
                    return Err("entity declarations are not allowed".to_string());
                }
            }
            Event::Start(start) => {
                check_element(&start, position)?;
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::Empty(start) => {
                check_element(&start, position)?;
                if depth == 0 {
                    roots += 1;
                }
            }
            Event::End(end) => {
                if depth == 0 {
                    return Err(format!(
                        "closing tag </{}> without opening tag at byte {}",
                        String::from_utf8_lossy(end.name().as_ref()),
                        position
                    ));
                }
                depth -= 1;
            }
            Event::Text(text) => {
                text.unescape()
                    .map_err(|e| format!("{} at byte {}", e, position))?;
                let blank = text.iter().all(u8::is_ascii_whitespace);
                if depth == 0 && !blank && mode == XmlMode::Document {
                    return Err(format!("text outside the root element at byte {}", position));
                }
            }
            Event::CData(_) if depth == 0 && mode == XmlMode::Document => {
                return Err(format!("CDATA outside the root element at byte {}", position));
            }
            Event::CData(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => break,
        }

        if depth == 0 && roots > 1 && mode == XmlMode::Document {
            return Err("more than one root element".to_string());
        }
        seen_any = true;
    }

    if depth > 0 {
        return Err(format!("{} unclosed element(s) at end of input", depth));
    }
    if mode == XmlMode::Document && roots == 0 {
        return Err("no root element".to_string());
    }
    Ok(())
}

fn check_element(start: &BytesStart<'_>, position: usize) -> std::result::Result<(), String> {
    let name = start.name();
    if !is_xml_name(name.as_ref()) {
        return Err(format!(
            "invalid element name '{}' at byte {}",
            String::from_utf8_lossy(name.as_ref()),
            position
        ));
    }
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| format!("{} at byte {}", e, position))?;
        if !is_xml_name(attribute.key.as_ref()) {
            return Err(format!("invalid attribute name at byte {}", position));
        }
        attribute
            .unescape_value()
            .map_err(|e| format!("{} at byte {}", e, position))?;
    }
    Ok(())
}

fn is_xml_name(name: &[u8]) -> bool {
    let Some((&first, rest)) = name.split_first() else {
        return false;
    };
    let start_ok = first.is_ascii_alphabetic() || first == b'_' || first == b':' || first >= 0x80;
    start_ok
        && rest.iter().all(|&b| {
            b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b':') || b >= 0x80
        })
}

/// Every non-blank line is a well-formed `key:value` entry.
pub fn check_cdb_list(content: &str) -> bool {
    cdb_list_error(content).is_none()
}

/// First malformed entry of a CDB list, if any.
pub fn cdb_list_error(content: &str) -> Option<String> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .find(|(_, line)| !CDB_LINE.is_match(line))
        .map(|(index, line)| {
            debug!(line = index + 1, "cdb list rejected");
            format!("line {}: '{}' is not a key:value entry", index + 1, line)
        })
}

/// Drop blank lines, trim every entry and terminate each with a newline.
pub fn normalize_cdb_list(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(String::with_capacity(content.len() + 1), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
}

/// Read a rule/decoder file and check it. Unreadable files are an error,
/// malformed ones are `Ok(false)`.
pub fn validate_xml_file(path: &Path) -> Result<bool> {
    Ok(read_text(path)?.is_some_and(|content| check_xml_fragment(&content)))
}

/// Read a single-root XML document, such as a configuration file, and
/// check it. Unreadable files are an error, malformed ones are `Ok(false)`.
pub fn validate_xml_document_file(path: &Path) -> Result<bool> {
    Ok(read_text(path)?.is_some_and(|content| check_xml(&content)))
}

/// Read a CDB list and check it. Unreadable files are an error, malformed
/// ones are `Ok(false)`.
pub fn validate_cdb_list_file(path: &Path) -> Result<bool> {
    Ok(read_text(path)?.is_some_and(|content| check_cdb_list(&content)))
}

/// Read a resource file as text. `None` means the bytes are not UTF-8,
/// which makes the file malformed rather than unreadable.
pub(crate) fn read_text(path: &Path) -> Result<Option<String>> {
    let bytes = FileOps::read_bytes_with_context(path)?;
    match String::from_utf8(bytes) {
        Ok(content) => Ok(Some(content)),
        Err(e) => {
            debug!(path = %path.display(), error = %e.utf8_error(), "resource is not UTF-8");
            Ok(None)
        }
    }
}
