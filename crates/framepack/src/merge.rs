//! Fat bundle creation from per-architecture builds.

use crate::PackResult;
use crate::bundle::{ArchBundle, MergedBundle};
use crate::error::PackError;
use crate::fsops;
use crate::naming::ArtifactNaming;
use crate::tools::Toolchain;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Post-merge processing switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Strip the merged executable, keeping an unstripped copy next to
    /// the bundle.
    pub strip: bool,
    /// Extract a debug-symbol bundle from the merged executable. Always
    /// runs before any stripping.
    pub extract_dsym: bool,
}

/// Merge per-architecture bundles into one fat bundle under `dst`.
///
/// The first bundle provides the structural template: its tree is copied
/// (symlinks preserved), the versioned-layout symlinks are rebuilt, and
/// the template executable is replaced by the fat executable produced
/// from every input. Any bundle already at the destination is replaced
/// wholesale, so a retry after a partial failure starts clean.
pub fn create_fat_bundle(
    bundles: &[ArchBundle],
    dst: &Path,
    naming: &ArtifactNaming,
    tools: &Toolchain,
    options: MergeOptions,
) -> PackResult<MergedBundle> {
    if bundles.len() < 2 {
        return Err(PackError::NotEnoughBundles(bundles.len()));
    }
    let mut seen = BTreeSet::new();
    for bundle in bundles {
        if !seen.insert(bundle.arch()) {
            return Err(PackError::DuplicateArchitecture(bundle.arch()));
        }
    }

    let root = dst.join(naming.bundle_dir());
    tracing::info!("Merging {} bundles into {}", bundles.len(), root.display());

    fsops::remove_existing(&root)?;
    fsops::copy_dir(bundles[0].root(), &root)?;
    regenerate_bundle_symlinks(&root, naming)?;

    let executable = root.join(naming.executable_rel());
    let inputs: Vec<&Path> = bundles.iter().map(ArchBundle::executable).collect();
    tools.merger.merge(&inputs, &executable)?;
    fsops::set_executable(&executable)?;

    let dsym_bundle = if options.extract_dsym {
        let dsym = dst.join(naming.dsym_bundle());
        tracing::info!("Extracting debug symbols to {}", dsym.display());
        fsops::remove_existing(&dsym)?;
        tools.dsym_extractor.extract(&executable, &dsym)?;
        Some(dsym)
    } else {
        None
    };

    if options.strip {
        let unstripped = dst.join(naming.unstripped_copy());
        tracing::info!("Stripping {}", executable.display());
        fs::copy(&executable, &unstripped)?;
        tools.stripper.strip(&executable)?;
    }

    let archs = bundles.iter().map(ArchBundle::arch).collect();
    Ok(MergedBundle::new(root, executable, archs, dsym_bundle))
}

/// Rebuild the versioned-layout symlinks at the bundle root.
///
/// Build outputs sometimes arrive with the top-level symlinks materialized
/// into real copies. When `Versions/Current` is already a symlink the
/// template is taken as-is; otherwise the materialized entries are
/// replaced with the canonical links.
fn regenerate_bundle_symlinks(root: &Path, naming: &ArtifactNaming) -> PackResult<()> {
    let current = root.join("Versions/Current");
    let already_linked = fs::symlink_metadata(&current)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if already_linked {
        return Ok(());
    }

    fsops::remove_existing(&current)?;
    fsops::make_symlink(Path::new("A"), &current)?;

    for name in [naming.product(), "Headers", "Modules", "Resources"] {
        let top_level = root.join(name);
        fsops::remove_existing(&top_level)?;
        if root.join("Versions/A").join(name).exists() {
            fsops::make_symlink(&Path::new("Versions/Current").join(name), &top_level)?;
        }
    }
    Ok(())
}
