//! Codesign eligibility manifests.
//!
//! Release archives ship two manifest files naming every path inside the
//! archive that must be code-signed: `entitlements.txt` for binaries
//! signed with entitlements and `without_entitlements.txt` for binaries
//! signed without them. Signing itself happens downstream; this module
//! generates the manifests and validates them against the exact set of
//! paths the archive will contain, so a stale manifest fails the build
//! here instead of the signing step.

use crate::error::PackError;
use crate::fsops;
use crate::{ENTITLEMENTS_FILE, PackResult, WITHOUT_ENTITLEMENTS_FILE};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

/// The two codesign path lists shipped with a release archive.
///
/// Paths are archive-relative with forward-slash separators, and may
/// address files inside a nested archive
/// (e.g. `Kit.framework.zip/Versions/A/Kit`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodesignManifest {
    with_entitlements: Vec<String>,
    without_entitlements: Vec<String>,
}

impl CodesignManifest {
    /// Create a manifest from the two path lists.
    #[must_use]
    pub fn new(with_entitlements: Vec<String>, without_entitlements: Vec<String>) -> Self {
        Self {
            with_entitlements,
            without_entitlements,
        }
    }

    /// Build the manifest for an assembled container.
    ///
    /// Every slice executable and attached debug-symbol binary is signed
    /// without entitlements; `with_entitlements` is typically empty and
    /// passed through for callers that need it.
    #[must_use]
    pub fn for_container(
        container: &crate::container::DistributionContainer,
        with_entitlements: Vec<String>,
    ) -> Self {
        let mut without = container.executable_entries();
        without.extend(container.dsym_binary_entries());
        Self::new(with_entitlements, without)
    }

    /// Paths signed with entitlements.
    #[must_use]
    pub fn with_entitlements(&self) -> &[String] {
        &self.with_entitlements
    }

    /// Paths signed without entitlements.
    #[must_use]
    pub fn without_entitlements(&self) -> &[String] {
        &self.without_entitlements
    }

    /// Write both manifest files into `dir`.
    ///
    /// One path per line with a trailing newline; an empty list writes a
    /// single newline.
    pub fn write_to(&self, dir: &Path) -> PackResult<()> {
        write_list(&dir.join(ENTITLEMENTS_FILE), &self.with_entitlements)?;
        write_list(
            &dir.join(WITHOUT_ENTITLEMENTS_FILE),
            &self.without_entitlements,
        )?;
        Ok(())
    }

    /// Validate the manifest against the exact archive contents.
    ///
    /// A path may appear at most once across both lists, and every path
    /// must be present in `contents`. The first offending path is named
    /// in the error. This is a pure check over the given set; callers
    /// collect the contents once via [`collect_archive_contents`].
    pub fn validate(&self, contents: &BTreeSet<String>) -> PackResult<()> {
        let mut seen = BTreeSet::new();
        for path in self.with_entitlements.iter().chain(&self.without_entitlements) {
            if !seen.insert(path.as_str()) {
                return Err(PackError::DuplicateManifestEntry(path.clone()));
            }
        }
        for path in self.with_entitlements.iter().chain(&self.without_entitlements) {
            if !contents.contains(path) {
                return Err(PackError::ManifestPathNotFound(path.clone()));
            }
        }
        Ok(())
    }
}

/// Collect the archive-relative paths of every file and symlink reachable
/// from the declared content entries.
///
/// Directory entries contribute their contents rather than themselves,
/// matching what archive creation stores. A declared entry absent on disk
/// contributes nothing: if a manifest path depends on it, validation
/// names that path, and archive creation reports the missing entry as an
/// I/O error.
pub fn collect_archive_contents(root: &Path, entries: &[String]) -> PackResult<BTreeSet<String>> {
    let mut contents = BTreeSet::new();
    for entry in entries {
        if entry == "." {
            collect_tree(root, None, &mut contents)?;
            continue;
        }
        let path = root.join(entry);
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => collect_tree(&path, Some(entry), &mut contents)?,
            Ok(_) => {
                contents.insert(entry.clone());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(contents)
}

fn collect_tree(
    base: &Path,
    prefix: Option<&str>,
    contents: &mut BTreeSet<String>,
) -> PackResult<()> {
    for result in fsops::sorted_walk(base) {
        let entry = result?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = fsops::slash_path(entry.path().strip_prefix(base)?);
        let name = match prefix {
            Some(prefix) => format!("{prefix}/{rel}"),
            None => rel,
        };
        contents.insert(name);
    }
    Ok(())
}

fn write_list(path: &Path, entries: &[String]) -> PackResult<()> {
    let mut contents = entries.join("\n");
    contents.push('\n');
    fs::write(path, contents)?;
    Ok(())
}
