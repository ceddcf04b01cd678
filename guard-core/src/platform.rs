// Standard library
use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A cross-platform equivalent of `realpath --relative-to`.
pub fn portable_relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    pathdiff::diff_paths(target, base)
}

/// Make `path` absolute against the current directory and fold `.`/`..`
/// lexically, without touching the filesystem.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    Ok(normalized)
}

/// Symlinks followed by [`realpath_lenient`] before giving up, as `ELOOP`.
const MAX_SYMLINK_HOPS: usize = 40;

/// Resolve symlinks along `path` like `realpath` in non-strict mode.
///
/// Every existing prefix is canonicalized. A dangling symlink is still
/// followed: its target is read and resolved against the link's parent.
/// Components past the deepest existing ancestor are appended as-is, with
/// `..` popping the already resolved parent.
pub fn realpath_lenient(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };
    let mut hops = 0;
    resolve_lenient(&joined, &mut hops)
}

fn resolve_lenient(path: &Path, hops: &mut usize) -> io::Result<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(part) => {
                resolved.push(part);
                if let Ok(real) = resolved.canonicalize() {
                    resolved = real;
                    continue;
                }

                let is_link = fs::symlink_metadata(&resolved)
                    .map(|meta| meta.file_type().is_symlink())
                    .unwrap_or(false);
                if is_link {
                    *hops += 1;
                    if *hops > MAX_SYMLINK_HOPS {
                        return Err(io::Error::new(
                            io::ErrorKind::Other,
                            format!("too many levels of symbolic links: {}", resolved.display()),
                        ));
                    }
                    let target = fs::read_link(&resolved)?;
                    resolved.pop();
                    resolved = resolve_lenient(&resolved.join(target), hops)?;
                }
            }
        }
    }
    Ok(resolved)
}

/// Apply unix permission bits. No-op on platforms without mode bits.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
