//! Path confinement.
//!
//! Every path that reaches the managed tree, whether it arrives as a request
//! field or as an upload destination, goes through [`is_safe_path`] or its
//! error-returning twin [`confine`].

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use guard_core::error::{GuardError, Result};
use guard_core::platform::realpath_lenient;
use tracing::debug;

/// Raw substrings rejected before any resolution happens.
const TRAVERSAL_MARKERS: [&str; 2] = ["./", "../"];

/// Returns `true` when `path` resolves to `base_dir` or somewhere beneath it.
///
/// With `relative` set, `path` is interpreted under `base_dir` (leading
/// separators are ignored); otherwise it is resolved on its own. Symlinks are
/// followed on both sides before the component-wise prefix check, so
/// `/base-evil` never passes for `/base`.
pub fn is_safe_path(path: &str, base_dir: &Path, relative: bool) -> bool {
    resolve_confined(path, base_dir, relative).is_some()
}

/// Like [`is_safe_path`], but hands back the resolved location or an
/// [`GuardError::InvalidPath`].
pub fn confine(path: &str, base_dir: &Path, relative: bool) -> Result<PathBuf> {
    resolve_confined(path, base_dir, relative).ok_or_else(|| {
        GuardError::InvalidPath(format!(
            "'{}' is not confined to {}",
            path,
            base_dir.display()
        ))
    })
}

fn resolve_confined(path: &str, base_dir: &Path, relative: bool) -> Option<PathBuf> {
    if TRAVERSAL_MARKERS.iter().any(|marker| path.contains(marker)) {
        debug!(path, "rejected traversal marker");
        return None;
    }

    let candidate = if relative {
        base_dir.join(path.trim_start_matches(|c: char| c == '/' || c == MAIN_SEPARATOR))
    } else {
        PathBuf::from(path)
    };

    let full_path = realpath_lenient(&candidate).ok()?;
    let full_base = realpath_lenient(base_dir).ok()?;

    if full_path.starts_with(&full_base) {
        Some(full_path)
    } else {
        debug!(
            path,
            resolved = %full_path.display(),
            base = %full_base.display(),
            "path escapes base directory"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn base() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("etc/rules")).unwrap();
        temp
    }

    #[test]
    fn test_relative_descendant_is_safe() {
        let temp = base();
        assert!(is_safe_path("etc/rules/local_rules.xml", temp.path(), true));
        assert!(is_safe_path("subdir/file.xml", temp.path(), true));
    }

    #[test]
    fn test_leading_separators_are_ignored_for_relative_paths() {
        let temp = base();
        assert!(is_safe_path("/etc/rules", temp.path(), true));
        assert!(is_safe_path("//etc", temp.path(), true));
    }

    #[test]
    fn test_traversal_markers_rejected_before_resolution() {
        let temp = base();
        assert!(!is_safe_path("../../etc/passwd", temp.path(), true));
        assert!(!is_safe_path("etc/./rules", temp.path(), true));
        assert!(!is_safe_path("etc/rules/../../..", temp.path(), true));
    }

    #[test]
    fn test_bare_parent_component_is_resolved() {
        let temp = base();
        // No trailing slash, so the raw check lets it through; resolution decides.
        assert!(is_safe_path("etc/..", temp.path(), true));
        assert!(!is_safe_path("..", temp.path(), true));
    }

    #[test]
    fn test_sibling_with_shared_prefix_is_not_confined() {
        let parent = TempDir::new().unwrap();
        let base = parent.path().join("base");
        let evil = parent.path().join("base-evil");
        fs::create_dir_all(&base).unwrap();
        fs::create_dir_all(&evil).unwrap();

        let absolute = evil.join("file.xml");
        assert!(!is_safe_path(absolute.to_str().unwrap(), &base, false));
    }

    #[test]
    fn test_absolute_paths() {
        let temp = base();
        let inside = temp.path().join("etc/rules/x.xml");
        assert!(is_safe_path(inside.to_str().unwrap(), temp.path(), false));
        assert!(!is_safe_path("/etc/passwd", temp.path(), false));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_rejected() {
        let temp = base();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("etc/escape")).unwrap();

        assert!(!is_safe_path("etc/escape/passwd", temp.path(), true));
    }

    #[test]
    fn test_confine_returns_resolved_location() {
        let temp = base();
        let resolved = confine("etc/rules/new.xml", temp.path(), true).unwrap();
        assert!(resolved.ends_with("etc/rules/new.xml"));

        let err = confine("../outside", temp.path(), true).unwrap_err();
        assert_eq!(err.kind(), guard_core::ErrorKind::InvalidPath);
    }
}
