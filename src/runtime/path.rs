//! Path utility functions for normalization and comparison.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep the `..` when there is nothing left to pop (relative paths)
                // or when the previous component is itself a `..`.
                let can_pop = matches!(
                    result.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    result.pop();
                } else if !matches!(
                    result.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    result.push(component);
                }
            }
            _ => {
                result.push(component);
            }
        }
    }
    result
}

/// Resolve `path` against `base` unless it is already absolute, then normalize.
///
/// `resolve_against("/work/app", "../shared")` is `/work/shared`.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Calculate the relative path from a symlink location to a target.
///
/// For example, if creating a symlink at `/app/vendor/bin/tool` pointing to
/// `/shared/acme/tool/1.0.0/bin/tool`, this returns
/// `../../../shared/acme/tool/1.0.0/bin/tool`.
///
/// Returns `None` if a relative path cannot be computed (e.g., different drive letters on Windows).
pub fn relative_symlink_path(from_link: &Path, to_target: &Path) -> Option<PathBuf> {
    let from_dir = from_link.parent()?;
    let result = pathdiff::diff_paths(to_target, from_dir)?;

    if result.is_absolute() {
        return None;
    }

    Some(result)
}

/// Strip trailing `/` (and `\` on Windows) from a configured path string.
/// A lone root separator is kept.
pub fn strip_trailing_separator(value: &str) -> &str {
    let trimmed = value.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
    if trimmed.is_empty() && !value.is_empty() {
        &value[..1]
    } else {
        trimmed
    }
}
