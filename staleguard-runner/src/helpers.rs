// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Utilities for pluralizing various words based on count or plurality.
pub(crate) mod plural {
    /// Returns "file" if `count` is 1, otherwise "files".
    pub(crate) fn files_str(count: usize) -> &'static str {
        if count == 1 { "file" } else { "files" }
    }

    /// Returns "test" if `count` is 1, otherwise "tests".
    pub(crate) fn tests_str(count: usize) -> &'static str {
        if count == 1 { "test" } else { "tests" }
    }
}

/// Makes `path` absolute against `base`, then lexically removes `.` and `..`
/// components.
///
/// Symlinks are not resolved: the path doesn't need to exist.
pub(crate) fn absolutize(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    let joined = if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    };

    let mut out = Utf8PathBuf::new();
    for component in joined.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                // Popping past the root is a no-op, matching how the OS treats `/..`.
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

/// Expresses `path` relative to `base`, after making it absolute.
///
/// Falls back to the absolute path if no relative form exists (e.g. a different
/// drive on Windows).
pub(crate) fn relativize(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    let absolute = absolutize(path, base);
    let relative =
        pathdiff::diff_utf8_paths(&absolute, base).unwrap_or_else(|| absolute.clone());
    convert_rel_path_to_forward_slash(&relative)
}

/// On Windows, convert relative paths to always use forward slashes.
#[cfg(windows)]
pub(crate) fn convert_rel_path_to_forward_slash(rel_path: &Utf8Path) -> Utf8PathBuf {
    if !rel_path.is_relative() {
        return rel_path.to_path_buf();
    }
    rel_path.as_str().replace('\\', "/").into()
}

#[cfg(not(windows))]
pub(crate) fn convert_rel_path_to_forward_slash(rel_path: &Utf8Path) -> Utf8PathBuf {
    rel_path.to_path_buf()
}
