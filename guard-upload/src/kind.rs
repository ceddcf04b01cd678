use std::borrow::Cow;
use std::fmt;

use guard_core::error::{GuardError, Result};

use crate::content;

/// The kinds of resource the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Rule or decoder definitions.
    Xml,
    /// CDB lookup list.
    CdbList,
}

impl ResourceKind {
    /// Extension of the staging file.
    pub fn extension(self) -> &'static str {
        match self {
            ResourceKind::Xml => "xml",
            ResourceKind::CdbList => "txt",
        }
    }

    /// Permission bits while the file sits in the staging directory.
    pub fn staged_mode(self) -> u32 {
        match self {
            ResourceKind::Xml => 0o660,
            ResourceKind::CdbList => 0o640,
        }
    }

    /// Permission bits of the committed file.
    pub fn final_mode(self) -> u32 {
        0o660
    }

    /// Bytes that will actually be staged for `content`.
    ///
    /// XML is written verbatim. Lists drop blank lines, trim every entry and
    /// end each one with a newline.
    pub fn prepare(self, content: &str) -> Cow<'_, str> {
        match self {
            ResourceKind::Xml => Cow::Borrowed(content),
            ResourceKind::CdbList => Cow::Owned(content::normalize_cdb_list(content)),
        }
    }

    /// Check `content` and describe the first syntax problem as this kind's
    /// malformed-content error.
    pub fn check(self, content: &str) -> Result<()> {
        let problem = match self {
            ResourceKind::Xml => content::xml_fragment_error(content),
            ResourceKind::CdbList => content::cdb_list_error(content),
        };
        match problem {
            None => Ok(()),
            Some(detail) => Err(self.malformed(detail)),
        }
    }

    pub(crate) fn malformed(self, detail: String) -> GuardError {
        match self {
            ResourceKind::Xml => GuardError::MalformedXml(detail),
            ResourceKind::CdbList => GuardError::MalformedList(detail),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Xml => write!(f, "xml"),
            ResourceKind::CdbList => write!(f, "cdb list"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_bits() {
        assert_eq!(ResourceKind::Xml.staged_mode(), 0o660);
        assert_eq!(ResourceKind::CdbList.staged_mode(), 0o640);
        assert_eq!(ResourceKind::Xml.final_mode(), 0o660);
        assert_eq!(ResourceKind::CdbList.final_mode(), 0o660);
    }

    #[test]
    fn test_malformed_codes_differ_by_kind() {
        let xml = ResourceKind::Xml.check("<group>").unwrap_err();
        let list = ResourceKind::CdbList.check(":value").unwrap_err();
        assert_eq!(xml.code(), 1113);
        assert_eq!(list.code(), 1802);
        assert_eq!(xml.kind(), list.kind());
    }

    #[test]
    fn test_only_lists_are_rewritten() {
        let xml = "<group>\n\n</group>";
        assert!(matches!(ResourceKind::Xml.prepare(xml), Cow::Borrowed(_)));
        assert_eq!(ResourceKind::CdbList.prepare("  a:b \n\n c:\n"), "a:b\nc:\n");
    }
}
