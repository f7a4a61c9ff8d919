//! Filesystem primitives shared by the packaging stages.
//!
//! Bundles are directory trees that lean on symlinks for their versioned
//! layout, so every copy here preserves symlinks as symlinks rather than
//! following them.

use crate::PackResult;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Walk a directory tree depth-first in sorted order.
///
/// Symlinks are reported, not followed. Archive creation and codesign
/// manifest collection both walk through here, so the validated path set
/// and the archived path set always agree.
pub fn sorted_walk(root: &Path) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> {
    WalkDir::new(root).sort_by_file_name().into_iter()
}

/// Remove a file, directory tree, or symlink if it exists.
///
/// Missing paths are not an error, so replace-style stages can run on a
/// clean output directory and on a retry alike.
pub fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Recursively copy a directory tree, preserving symlinks.
pub fn copy_dir(from: &Path, to: &Path) -> PackResult<()> {
    for entry in WalkDir::new(from) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(from)?;
        let dest = to.join(rel);
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            let target = fs::read_link(entry.path())?;
            make_symlink(&target, &dest)?;
        } else if file_type.is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

/// Move a file into place, replacing anything already at the destination.
pub fn replace_file(from: &Path, to: &Path) -> io::Result<()> {
    remove_existing(to)?;
    fs::rename(from, to)
}

/// Render a relative path with forward-slash separators.
///
/// Archive entry names and codesign manifest paths use `/` on every
/// platform.
#[must_use]
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Mark a file executable (`rwxr-xr-x`).
pub fn set_executable(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Create a symlink at `link` pointing at `target`.
#[cfg(unix)]
pub fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Create a symlink at `link` pointing at `target`.
#[cfg(windows)]
pub fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
