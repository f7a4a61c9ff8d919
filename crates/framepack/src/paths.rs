//! Build-root-relative path resolution.

use std::path::{Path, PathBuf};

/// Resolve a caller-supplied path against the build root.
///
/// Absolute paths pass through unchanged; relative paths are joined onto
/// the build root. No filesystem access and no normalization happens here,
/// so error messages later in the pipeline show the path as resolved.
#[must_use]
pub fn resolve(buildroot: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        buildroot.join(path)
    }
}
