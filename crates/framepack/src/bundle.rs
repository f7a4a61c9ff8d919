//! Per-architecture bundle validation and the merged bundle value.

use crate::PackResult;
use crate::arch::Arch;
use crate::error::PackError;
use crate::naming::ArtifactNaming;
use std::path::{Path, PathBuf};

/// A validated per-architecture build of the product bundle.
///
/// Locating a bundle proves the directory and its executable exist before
/// any output is touched; it never modifies the build output it points at.
#[derive(Debug, Clone)]
pub struct ArchBundle {
    arch: Arch,
    root: PathBuf,
    executable: PathBuf,
}

impl ArchBundle {
    /// Locate the bundle for one architecture under its build output
    /// directory.
    ///
    /// Fails with [`PackError::MissingBundle`] when the bundle directory
    /// is absent, or [`PackError::MissingExecutable`] when the directory
    /// exists but its executable does not.
    pub fn locate(arch: Arch, out_dir: &Path, naming: &ArtifactNaming) -> PackResult<Self> {
        let root = out_dir.join(naming.bundle_dir());
        if !root.is_dir() {
            return Err(PackError::MissingBundle { arch, path: root });
        }
        let executable = root.join(naming.executable_rel());
        if !executable.is_file() {
            return Err(PackError::MissingExecutable {
                arch,
                path: executable,
            });
        }
        Ok(Self {
            arch,
            root,
            executable,
        })
    }

    /// Architecture this bundle was built for.
    #[must_use]
    pub fn arch(&self) -> Arch {
        self.arch
    }

    /// Bundle root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bundle executable path.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

/// The product of a fat bundle merge: one bundle whose executable covers
/// every input architecture.
#[derive(Debug, Clone)]
pub struct MergedBundle {
    root: PathBuf,
    executable: PathBuf,
    archs: Vec<Arch>,
    dsym_bundle: Option<PathBuf>,
}

impl MergedBundle {
    pub(crate) fn new(
        root: PathBuf,
        executable: PathBuf,
        archs: Vec<Arch>,
        dsym_bundle: Option<PathBuf>,
    ) -> Self {
        Self {
            root,
            executable,
            archs,
            dsym_bundle,
        }
    }

    /// Merged bundle root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Merged (fat) executable path.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Architectures the executable covers.
    #[must_use]
    pub fn archs(&self) -> &[Arch] {
        &self.archs
    }

    /// Debug-symbol bundle extracted during the merge, when requested.
    #[must_use]
    pub fn dsym_bundle(&self) -> Option<&Path> {
        self.dsym_bundle.as_deref()
    }

    /// Container slice identifier for this bundle's architecture set,
    /// e.g. `macos-arm64_x86_64`.
    ///
    /// Components are sorted so the identifier never depends on merge
    /// input order.
    #[must_use]
    pub fn slice_identifier(&self) -> String {
        let mut components: Vec<&str> = self.archs.iter().map(Arch::slice_component).collect();
        components.sort_unstable();
        format!("{}-{}", crate::SUPPORTED_PLATFORM, components.join("_"))
    }
}
